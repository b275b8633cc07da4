use std::path::PathBuf;

use clap::{Args, Parser as ClapParser, Subcommand, ValueEnum};

#[derive(Debug, ClapParser)]
#[command(
    name       = env!("CARGO_PKG_NAME"),
    version    = env!("CARGO_PKG_VERSION"),
    author     = env!("CARGO_PKG_AUTHORS"),
    about      = "Tools for decoding WAVE audio and extracting Mel/MFCC features",
    long_about = None,
)]
pub struct Cli {
    /// Set the log level.
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub loglevel: LogLevel,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Show a progress bar while reading from a file (ignored for stdin).
    #[arg(long, global = true)]
    pub progress: bool,

    /// Choose an operation to perform.
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Decode a WAVE file's data chunk into raw little-endian samples.
    Wav2Raw(Wav2RawArgs),
    /// Produce overlapping fixed-length frames from a float32 LE sample stream.
    Frame(FrameArgs),
    /// Run the real-input FFT over float32 LE frames.
    Fftr(FftrArgs),
    /// Extract Mel-filterbank or MFCC feature vectors.
    Mfcc(MfccArgs),
}

#[derive(Debug, Args)]
pub struct Wav2RawArgs {
    /// Input WAVE file (use "-" for stdin).
    #[arg(value_name = "INPUT", default_value = "-")]
    pub input: PathBuf,

    /// Output path for raw samples (use "-" for stdout).
    #[arg(long, value_name = "PATH", default_value = "-")]
    pub output: PathBuf,

    /// Output sample representation.
    #[arg(long, value_enum, default_value_t = SampleFormat::F32)]
    pub format: SampleFormat,
}

#[derive(Debug, Args)]
pub struct FrameArgs {
    /// Input float32 LE sample stream (use "-" for stdin).
    #[arg(value_name = "INPUT", default_value = "-")]
    pub input: PathBuf,

    /// Output path for concatenated frames (use "-" for stdout).
    #[arg(long, value_name = "PATH", default_value = "-")]
    pub output: PathBuf,

    /// Frame length in samples.
    #[arg(long, default_value_t = 256)]
    pub length: usize,

    /// Frame shift in samples.
    #[arg(long, default_value_t = 100)]
    pub shift: usize,
}

#[derive(Debug, Args)]
pub struct FftrArgs {
    /// Input float32 LE frame stream (use "-" for stdin).
    #[arg(value_name = "INPUT", default_value = "-")]
    pub input: PathBuf,

    /// Output path for real/imag spectra (use "-" for stdout).
    #[arg(long, value_name = "PATH", default_value = "-")]
    pub output: PathBuf,

    /// Samples per frame (must be a power of two).
    #[arg(long, default_value_t = 256)]
    pub length: usize,
}

#[derive(Debug, Args)]
pub struct MfccArgs {
    /// Input WAVE bytes or float32 LE frames (use "-" for stdin).
    #[arg(value_name = "INPUT", default_value = "-")]
    pub input: PathBuf,

    /// Output path for feature vectors (use "-" for stdout).
    #[arg(long, value_name = "PATH", default_value = "-")]
    pub output: PathBuf,

    /// Whether stdin carries a WAVE file or already-framed float32 samples.
    #[arg(long, value_enum, default_value_t = InputKind::Wave)]
    pub input_kind: InputKind,

    /// Frame length in samples.
    #[arg(long, default_value_t = 256)]
    pub frame_length: usize,

    /// Frame shift in samples (only used when input-kind is "wave").
    #[arg(long, default_value_t = 100)]
    pub frame_shift: usize,

    /// Audio sample rate in Hz.
    #[arg(long, default_value_t = 16000)]
    pub sample_rate: u32,

    /// Subtract the per-frame mean before analysis.
    #[arg(long, default_value_t = true)]
    pub remove_dc_offset: bool,

    /// Standard deviation of additive Gaussian dither (0 disables it).
    #[arg(long, default_value_t = 1.0)]
    pub dither: f32,

    /// Pre-emphasis filter coefficient (0 disables it).
    #[arg(long, default_value_t = 0.97)]
    pub preemph_coeff: f32,

    /// Liftering coefficient applied to cepstral coefficients.
    #[arg(long, default_value_t = 22.0)]
    pub liftering_coeff: f64,

    /// Analysis window.
    #[arg(long, value_enum, default_value_t = WindowArg::Povey)]
    pub window: WindowArg,

    /// Blackman window coefficient (only used with --window blackman).
    #[arg(long, default_value_t = 0.42)]
    pub blackman_coeff: f64,

    /// Minimum Mel-filterbank channel energy before taking the log.
    #[arg(long, default_value_t = 1.0)]
    pub filterbank_floor: f64,

    /// Number of Mel-filterbank channels.
    #[arg(long, default_value_t = 20)]
    pub filterbank_num_bins: usize,

    /// Number of cepstral coefficients (MFCC output only).
    #[arg(long, default_value_t = 12)]
    pub mfcc_order: usize,

    /// Feature type to emit.
    #[arg(long, value_enum, default_value_t = OutputTypeArg::Mfcc)]
    pub output_type: OutputTypeArg,

    /// Append the zeroth cepstral coefficient to each feature vector.
    #[arg(long, default_value_t = true)]
    pub output_c0: bool,

    /// Append log-energy to each feature vector.
    #[arg(long, default_value_t = true)]
    pub output_energy: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    /// Disable logging output.
    Off,
    /// No output except errors.
    Error,
    /// Show warnings and errors.
    Warn,
    /// Show info, warnings and errors (default).
    Info,
    /// Show debug, info, warnings and errors.
    Debug,
    /// Show all log messages including trace.
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Colorized human-readable text.
    Plain,
    /// Structured JSON per log record.
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SampleFormat {
    I16,
    F32,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum InputKind {
    /// stdin carries a RIFF/WAVE file.
    Wave,
    /// stdin carries already-framed float32 LE samples.
    Frame,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum WindowArg {
    Hanning,
    Hamming,
    Povey,
    Rectangular,
    Blackman,
}

impl From<WindowArg> for wavfeat_core::dsp::window::WindowKind {
    fn from(value: WindowArg) -> Self {
        use wavfeat_core::dsp::window::WindowKind;
        match value {
            WindowArg::Hanning => WindowKind::Hanning,
            WindowArg::Hamming => WindowKind::Hamming,
            WindowArg::Povey => WindowKind::Povey,
            WindowArg::Rectangular => WindowKind::Rectangular,
            WindowArg::Blackman => WindowKind::Blackman,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputTypeArg {
    MelEnergy,
    Mfcc,
}

impl From<OutputTypeArg> for wavfeat_core::mfcc::OutputType {
    fn from(value: OutputTypeArg) -> Self {
        use wavfeat_core::mfcc::OutputType;
        match value {
            OutputTypeArg::MelEnergy => OutputType::MelEnergy,
            OutputTypeArg::Mfcc => OutputType::Mfcc,
        }
    }
}

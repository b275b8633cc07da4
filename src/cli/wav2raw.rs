use std::io::Write;

use anyhow::Result;
use indicatif::ProgressBar;
use wavfeat_core::io::sample::Sample;
use wavfeat_core::io::source::SampleSource;
use wavfeat_core::io::wave::WaveReader;

use crate::cli::command::{SampleFormat, Wav2RawArgs};
use crate::cli::progress_bar;
use crate::input::{InputReader, OutputWriter, input_len};

pub fn run(args: &Wav2RawArgs, show_progress: bool) -> Result<()> {
    let input = InputReader::new(&args.input)?;
    let mut output = OutputWriter::new(&args.output)?;
    let pb = progress_bar(show_progress, input_len(&args.input));

    let mut reader = WaveReader::new(input);
    let header = reader.get_header()?;
    log::info!(
        "decoding {} Hz, {} channel(s), {} bits/sample",
        header.sample_rate,
        header.num_channels,
        header.bits_per_sample
    );

    let samples_written = match args.format {
        SampleFormat::F32 => decode_loop::<f32>(&mut reader, &mut output, pb.as_ref())?,
        SampleFormat::I16 => decode_loop::<i16>(&mut reader, &mut output, pb.as_ref())?,
    };
    log::info!("wrote {samples_written} sample(s)");

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    Ok(())
}

fn decode_loop<T: Sample>(
    reader: &mut WaveReader<InputReader>,
    output: &mut OutputWriter,
    pb: Option<&ProgressBar>,
) -> Result<u64> {
    let mut buf = vec![T::default(); 4096];
    let mut bytes = vec![0u8; 4096 * T::WIDTH];
    let mut total = 0u64;

    loop {
        let n = reader.read_samples(&mut buf)?;
        if n == 0 {
            break;
        }
        for (chunk, sample) in bytes.chunks_exact_mut(T::WIDTH).zip(buf[..n].iter()) {
            sample.write_le_bytes(chunk);
        }
        output.write_all(&bytes[..n * T::WIDTH])?;
        total += n as u64;
        if let Some(pb) = pb {
            pb.inc((n * T::WIDTH) as u64);
        }
    }
    Ok(total)
}

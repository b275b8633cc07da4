use std::io::Write;

use anyhow::Result;
use wavfeat_core::dsp::fft::Fft;
use wavfeat_core::io::source::{ByteFrameSource, FrameSource};

use crate::cli::command::FftrArgs;
use crate::cli::progress_bar;
use crate::input::{InputReader, OutputWriter, input_len};

pub fn run(args: &FftrArgs, show_progress: bool) -> Result<()> {
    let input = InputReader::new(&args.input)?;
    let mut output = OutputWriter::new(&args.output)?;
    let pb = progress_bar(show_progress, input_len(&args.input));

    let fft = Fft::new(args.length)?;
    let mut source = ByteFrameSource::<InputReader>::new(input, args.length);

    let mut frame = vec![0.0f32; args.length];
    let mut real = vec![0.0f64; args.length];
    let mut imag = vec![0.0f64; args.length];
    let mut out_bytes = vec![0u8; args.length * 8];
    let mut frames_emitted = 0u64;

    while source.read_frame(&mut frame)? {
        for (r, &s) in real.iter_mut().zip(frame.iter()) {
            *r = s as f64;
        }
        imag.fill(0.0);
        fft.fftr(&mut real, &mut imag)?;

        let half_bytes = args.length * 4;
        for (chunk, &v) in out_bytes[..half_bytes].chunks_exact_mut(4).zip(real.iter()) {
            chunk.copy_from_slice(&(v as f32).to_le_bytes());
        }
        for (chunk, &v) in out_bytes[half_bytes..].chunks_exact_mut(4).zip(imag.iter()) {
            chunk.copy_from_slice(&(v as f32).to_le_bytes());
        }
        output.write_all(&out_bytes)?;
        frames_emitted += 1;
        if let Some(pb) = &pb {
            pb.inc(out_bytes.len() as u64);
        }
    }
    log::info!("emitted {frames_emitted} spectrum/spectra");

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    Ok(())
}

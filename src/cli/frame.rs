use std::io::Write;

use anyhow::Result;
use wavfeat_core::io::frame::{FrameMaker, FrameOpts};
use wavfeat_core::io::source::{ByteSampleSource, FrameSource};

use crate::cli::command::FrameArgs;
use crate::cli::progress_bar;
use crate::input::{InputReader, OutputWriter, input_len};

pub fn run(args: &FrameArgs, show_progress: bool) -> Result<()> {
    let input = InputReader::new(&args.input)?;
    let mut output = OutputWriter::new(&args.output)?;
    let pb = progress_bar(show_progress, input_len(&args.input));

    let source = ByteSampleSource::new(input);
    let mut maker = FrameMaker::<f32, _>::new(
        source,
        FrameOpts {
            length: args.length,
            shift: args.shift,
        },
    );

    let mut frame = vec![0.0f32; args.length];
    let mut bytes = vec![0u8; args.length * 4];
    let mut frames_emitted = 0u64;

    while maker.read_frame(&mut frame)? {
        for (chunk, sample) in bytes.chunks_exact_mut(4).zip(frame.iter()) {
            chunk.copy_from_slice(&sample.to_le_bytes());
        }
        output.write_all(&bytes)?;
        frames_emitted += 1;
        if let Some(pb) = &pb {
            pb.inc(bytes.len() as u64);
        }
    }
    log::info!("emitted {frames_emitted} frame(s)");

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    Ok(())
}

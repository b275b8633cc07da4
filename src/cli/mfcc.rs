use std::io::Write;

use anyhow::Result;
use indicatif::ProgressBar;
use wavfeat_core::io::frame::{FrameMaker, FrameOpts};
use wavfeat_core::io::source::{ByteFrameSource, FrameSource};
use wavfeat_core::io::wave::WaveReader;
use wavfeat_core::mfcc::{MelOpts, MfccMaker};

use crate::cli::command::{InputKind, MfccArgs};
use crate::cli::progress_bar;
use crate::input::{InputReader, OutputWriter, input_len};

fn build_opts(args: &MfccArgs) -> MelOpts {
    MelOpts {
        frame_length: args.frame_length,
        sample_rate: args.sample_rate,
        remove_dc_offset: args.remove_dc_offset,
        dither: args.dither,
        preemph_coeff: args.preemph_coeff,
        liftering_coeff: args.liftering_coeff,
        blackman_coeff: args.blackman_coeff,
        window: args.window.into(),
        filterbank_floor: args.filterbank_floor,
        filterbank_num_bins: args.filterbank_num_bins,
        mfcc_order: args.mfcc_order,
        output_type: args.output_type.into(),
        output_energy: args.output_energy,
        output_c0: args.output_c0,
    }
}

pub fn run(args: &MfccArgs, show_progress: bool) -> Result<()> {
    let input = InputReader::new(&args.input)?;
    let mut output = OutputWriter::new(&args.output)?;
    let pb = progress_bar(show_progress, input_len(&args.input));
    let opts = build_opts(args);

    let vectors_emitted = match args.input_kind {
        InputKind::Wave => {
            let reader = WaveReader::new(input);
            let framer = FrameMaker::<f32, _>::new(
                reader,
                FrameOpts {
                    length: args.frame_length,
                    shift: args.frame_shift,
                },
            );
            let mut maker = MfccMaker::new(framer, opts)?;
            drive(&mut maker, &mut output, pb.as_ref())?
        }
        InputKind::Frame => {
            let framer = ByteFrameSource::<InputReader>::new(input, args.frame_length);
            let mut maker = MfccMaker::new(framer, opts)?;
            drive(&mut maker, &mut output, pb.as_ref())?
        }
    };
    log::info!("emitted {vectors_emitted} feature vector(s)");

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    Ok(())
}

fn drive<Fr: FrameSource<f32>>(
    maker: &mut MfccMaker<Fr>,
    output: &mut OutputWriter,
    pb: Option<&ProgressBar>,
) -> Result<u64> {
    let mut frame = vec![0.0f32; maker.feat_length()];
    let mut bytes = vec![0u8; maker.feat_length() * 4];
    let mut count = 0u64;

    while maker.read_frame(&mut frame)? {
        for (chunk, &v) in bytes.chunks_exact_mut(4).zip(frame.iter()) {
            chunk.copy_from_slice(&v.to_le_bytes());
        }
        output.write_all(&bytes)?;
        count += 1;
        if let Some(pb) = pb {
            pb.inc(bytes.len() as u64);
        }
    }
    Ok(count)
}

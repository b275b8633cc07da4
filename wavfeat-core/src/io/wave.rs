//! RIFF/WAVE chunk parsing and multi-format sample decode.
//!
//! Parses a RIFF/WAVE container one chunk at a time, locates `"fmt "`
//! before `"data"`, and decodes sample bytes from the data chunk on demand.
//! All decoded samples pass through a canonical signed 32-bit intermediate
//! (§3, Data Model) before being narrowed to the caller's chosen
//! [`Sample`] type.

use std::io::Read;

use crate::io::sample::Sample;
use crate::io::source::SampleSource;
use crate::utils::errors::{CoreError, WaveError};

const RIFF_MAGIC: [u8; 4] = *b"RIFF";
const WAVE_MAGIC: [u8; 4] = *b"WAVE";
const FMT_CHUNK_ID: [u8; 4] = *b"fmt ";
const DATA_CHUNK_ID: [u8; 4] = *b"data";

/// The effective WAVE format code (§3, Data Model).
///
/// For [`FormatCode::Extensible`] streams, `WaveHeader::format` holds the
/// *resolved* sub-format, not `0xFFFE` itself — callers never need to
/// special-case Extensible once the header has been parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatCode {
    Pcm,
    IeeeFloat,
    ALaw,
    ULaw,
}

impl FormatCode {
    fn from_u16(code: u16) -> Option<Self> {
        match code {
            1 => Some(FormatCode::Pcm),
            3 => Some(FormatCode::IeeeFloat),
            6 => Some(FormatCode::ALaw),
            7 => Some(FormatCode::ULaw),
            _ => None,
        }
    }

    fn valid_bits(self, bits: u16) -> bool {
        match self {
            FormatCode::Pcm => matches!(bits, 8 | 16 | 24 | 32),
            FormatCode::IeeeFloat => bits == 32,
            FormatCode::ALaw | FormatCode::ULaw => bits == 8,
        }
    }
}

const WAVE_FORMAT_EXTENSIBLE: u16 = 0xFFFE;

/// `WAVEFORMATEXTENSIBLE` fields, present only when the raw format code is
/// `0xFFFE` and the `"fmt "` chunk is large enough to carry them.
#[derive(Debug, Clone)]
pub struct WaveExtension {
    pub valid_bits_per_sample: u16,
    pub channel_mask: u32,
    pub sub_format_code: u16,
    pub sub_format_guid_tail: [u8; 14],
}

/// Parsed `"fmt "` chunk contents, with Extensible sub-formats resolved.
#[derive(Debug, Clone)]
pub struct WaveHeader {
    pub format: FormatCode,
    pub num_channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub extension: Option<WaveExtension>,
}

impl WaveHeader {
    fn bytes_per_sample(&self) -> usize {
        self.bits_per_sample as usize / 8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    Fresh,
    Draining,
    Eof,
}

/// Consumes a byte stream, parses RIFF/WAVE chunks, and decodes sample
/// bytes into a caller-chosen [`Sample`] type.
///
/// The header is parsed at most once, on the first call to
/// [`read_samples`](Self::read_samples) or [`get_header`](Self::get_header).
/// Once a fatal error is returned, the reader is left in a sticky failed
/// state and every subsequent call returns
/// [`WaveError::BadState`](crate::utils::errors::WaveError::BadState).
pub struct WaveReader<R> {
    reader: R,
    state: ReaderState,
    header: Option<WaveHeader>,
    data_remaining: u64,
    failed: bool,
}

impl<R: Read> WaveReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            state: ReaderState::Fresh,
            header: None,
            data_remaining: 0,
            failed: false,
        }
    }

    /// Forces header parsing if it hasn't happened yet, and returns a copy.
    pub fn get_header(&mut self) -> Result<WaveHeader, CoreError> {
        self.ensure_not_failed()?;
        self.ensure_header_parsed()?;
        Ok(self.header.clone().expect("header parsed above"))
    }

    fn ensure_not_failed(&self) -> Result<(), CoreError> {
        if self.failed {
            return Err(WaveError::BadState.into());
        }
        Ok(())
    }

    fn fail<E: Into<CoreError>>(&mut self, err: E) -> CoreError {
        self.failed = true;
        err.into()
    }

    fn ensure_header_parsed(&mut self) -> Result<(), CoreError> {
        if self.header.is_some() {
            return Ok(());
        }
        match self.parse_header() {
            Ok(()) => Ok(()),
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Reads exactly `buf.len()` bytes or fails with `UnexpectedEof`.
    fn read_exact_ctx(&mut self, buf: &mut [u8], context: &str) -> Result<(), WaveError> {
        self.reader
            .read_exact(buf)
            .map_err(|_| WaveError::UnexpectedEof(context.to_string()))
    }

    /// Skips exactly `len` bytes, failing with `UnexpectedEof` on short read.
    fn skip_exact(&mut self, len: u64, context: &str) -> Result<(), WaveError> {
        let mut remaining = len;
        let mut buf = [0u8; 4096];
        while remaining > 0 {
            let chunk = remaining.min(buf.len() as u64) as usize;
            self.read_exact_ctx(&mut buf[..chunk], context)?;
            remaining -= chunk as u64;
        }
        Ok(())
    }

    fn parse_header(&mut self) -> Result<(), CoreError> {
        let mut magic = [0u8; 4];
        self.read_exact_ctx(&mut magic, "RIFF magic")?;
        if magic != RIFF_MAGIC {
            return Err(WaveError::BadRiffMagic(magic).into());
        }

        let mut riff_size = [0u8; 4];
        self.read_exact_ctx(&mut riff_size, "RIFF size")?;

        self.read_exact_ctx(&mut magic, "WAVE magic")?;
        if magic != WAVE_MAGIC {
            return Err(WaveError::BadWaveMagic(magic).into());
        }

        let mut fmt: Option<WaveHeader> = None;

        loop {
            let mut chunk_id = [0u8; 4];
            let mut chunk_size_bytes = [0u8; 4];

            match self.reader.read_exact(&mut chunk_id) {
                Ok(()) => {}
                Err(_) if fmt.is_none() => {
                    return Err(
                        WaveError::UnexpectedEof("chunk header before data chunk".into()).into(),
                    );
                }
                Err(_) => {
                    return Err(WaveError::UnexpectedEof("data chunk never found".into()).into());
                }
            }
            self.read_exact_ctx(&mut chunk_size_bytes, "chunk size")?;
            let chunk_size = u32::from_le_bytes(chunk_size_bytes);

            if chunk_id == FMT_CHUNK_ID {
                if !(16..=40).contains(&chunk_size) {
                    return Err(WaveError::BadFmtChunkSize(chunk_size).into());
                }
                let mut scratch = [0u8; 40];
                self.read_exact_ctx(&mut scratch[..chunk_size as usize], "fmt chunk body")?;
                fmt = Some(parse_fmt_chunk(&scratch, chunk_size)?);
                if chunk_size % 2 == 1 {
                    self.skip_exact(1, "fmt chunk pad byte")?;
                }
            } else if chunk_id == DATA_CHUNK_ID {
                let header = fmt.ok_or(WaveError::DataBeforeFmt)?;
                self.header = Some(header);
                self.data_remaining = chunk_size as u64;
                return Ok(());
            } else {
                self.skip_exact(chunk_size as u64, "unknown chunk body")?;
                if chunk_size % 2 == 1 {
                    self.skip_exact(1, "unknown chunk pad byte")?;
                }
            }
        }
    }

    fn decode_one(&self, header: &WaveHeader, raw: &[u8]) -> i32 {
        match (header.format, header.bits_per_sample) {
            (FormatCode::Pcm, 8) => {
                let b = raw[0] as u32;
                ((b << 24) ^ 0x8000_0000) as i32
            }
            (FormatCode::Pcm, 16) => {
                let v = i16::from_le_bytes([raw[0], raw[1]]);
                (v as i32) << 16
            }
            (FormatCode::Pcm, 24) => {
                let val24 = raw[0] as u32 | (raw[1] as u32) << 8 | (raw[2] as u32) << 16;
                let signed24 = ((val24 << 8) as i32) >> 8;
                signed24 << 8
            }
            (FormatCode::Pcm, 32) => i32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]),
            (FormatCode::IeeeFloat, 32) => {
                let f = f32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]) as f64;
                let scale = 1.0 + i32::MAX as f64;
                let scaled = f * scale;
                let rounded = if scaled >= 0.0 {
                    (scaled + 0.5).floor()
                } else {
                    (scaled - 0.5).ceil()
                };
                rounded.clamp(i32::MIN as f64, i32::MAX as f64) as i32
            }
            (FormatCode::ALaw, 8) => (ALAW_TABLE[raw[0] as usize] as i32) << 16,
            (FormatCode::ULaw, 8) => (ULAW_TABLE[raw[0] as usize] as i32) << 16,
            (format, bits) => unreachable!(
                "unsupported format/bits combination {format:?}/{bits} survived header validation"
            ),
        }
    }
}

impl<R: Read, T: Sample> SampleSource<T> for WaveReader<R> {
    fn read_samples(&mut self, dst: &mut [T]) -> Result<usize, CoreError> {
        self.ensure_not_failed()?;
        self.ensure_header_parsed()?;

        if matches!(self.state, ReaderState::Eof) {
            return Ok(0);
        }

        let header = self.header.clone().expect("header parsed above");
        let width = header.bytes_per_sample() as u64;

        if self.data_remaining == 0 {
            self.state = ReaderState::Eof;
            return Ok(0);
        }
        if self.data_remaining < width {
            return Err(self.fail(WaveError::UnexpectedEof(format!(
                "{} trailing byte(s) in data chunk do not form a complete sample",
                self.data_remaining
            ))));
        }

        let available = (self.data_remaining / width) as usize;
        let n = dst.len().min(available);

        let mut raw = vec![0u8; n * width as usize];
        if let Err(e) = self.read_exact_ctx(&mut raw, "data chunk sample bytes") {
            return Err(self.fail(e));
        }

        for (i, sample) in dst.iter_mut().take(n).enumerate() {
            let start = i * width as usize;
            let canonical = self.decode_one(&header, &raw[start..start + width as usize]);
            *sample = T::from_canonical(canonical);
        }

        self.data_remaining -= n as u64 * width;
        self.state = ReaderState::Draining;
        Ok(n)
    }
}

fn parse_fmt_chunk(scratch: &[u8; 40], chunk_size: u32) -> Result<WaveHeader, WaveError> {
    let raw_format = u16::from_le_bytes([scratch[0], scratch[1]]);
    let num_channels = u16::from_le_bytes([scratch[2], scratch[3]]);
    let sample_rate = u32::from_le_bytes([scratch[4], scratch[5], scratch[6], scratch[7]]);
    let byte_rate = u32::from_le_bytes([scratch[8], scratch[9], scratch[10], scratch[11]]);
    let block_align = u16::from_le_bytes([scratch[12], scratch[13]]);
    let bits_per_sample = u16::from_le_bytes([scratch[14], scratch[15]]);

    let mut extension = None;
    let mut effective_format_code = raw_format;

    if chunk_size >= 18 {
        let extension_size = u16::from_le_bytes([scratch[16], scratch[17]]);
        if raw_format == WAVE_FORMAT_EXTENSIBLE && extension_size >= 22 && chunk_size >= 40 {
            let valid_bits_per_sample = u16::from_le_bytes([scratch[18], scratch[19]]);
            let channel_mask =
                u32::from_le_bytes([scratch[20], scratch[21], scratch[22], scratch[23]]);
            let sub_format_code = u16::from_le_bytes([scratch[24], scratch[25]]);
            let mut sub_format_guid_tail = [0u8; 14];
            sub_format_guid_tail.copy_from_slice(&scratch[26..40]);

            effective_format_code = sub_format_code;
            extension = Some(WaveExtension {
                valid_bits_per_sample,
                channel_mask,
                sub_format_code,
                sub_format_guid_tail,
            });
        }
    }

    let format = FormatCode::from_u16(effective_format_code)
        .ok_or(WaveError::UnsupportedFormat(effective_format_code))?;
    if !format.valid_bits(bits_per_sample) {
        return Err(WaveError::UnsupportedSampleType {
            format,
            bits: bits_per_sample,
        });
    }

    Ok(WaveHeader {
        format,
        num_channels,
        sample_rate,
        byte_rate,
        block_align,
        bits_per_sample,
        extension,
    })
}

const fn alaw_decode(a_val: u8) -> i16 {
    let a_val = a_val ^ 0x55;
    let seg = ((a_val & 0x70) as i32) >> 4;
    let mut t = ((a_val & 0x0f) as i32) << 4;
    t = match seg {
        0 => t + 8,
        1 => t + 0x108,
        _ => {
            t += 0x108;
            t << (seg - 1)
        }
    };
    (if a_val & 0x80 != 0 { t } else { -t }) as i16
}

const fn ulaw_decode(u_val: u8) -> i16 {
    let u_val = !u_val;
    let mut t = (((u_val & 0x0f) as i32) << 3) + 0x84;
    t <<= ((u_val & 0x70) as i32) >> 4;
    (if u_val & 0x80 != 0 { 0x84 - t } else { t - 0x84 }) as i16
}

const fn alaw_table() -> [i16; 256] {
    let mut table = [0i16; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = alaw_decode(i as u8);
        i += 1;
    }
    table
}

const fn ulaw_table() -> [i16; 256] {
    let mut table = [0i16; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = ulaw_decode(i as u8);
        i += 1;
    }
    table
}

/// ITU-T G.711 A-law decode table, computed at compile time.
pub const ALAW_TABLE: [i16; 256] = alaw_table();

/// ITU-T G.711 mu-law decode table, computed at compile time.
pub const ULAW_TABLE: [i16; 256] = ulaw_table();

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn pcm16_wave(samples: &[i16]) -> Vec<u8> {
        let mut data = Vec::new();
        for &s in samples {
            data.extend_from_slice(&s.to_le_bytes());
        }
        build_wave(1, 1, 16000, 16, &data)
    }

    fn build_wave(format: u16, channels: u16, rate: u32, bits: u16, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"RIFF");
        let riff_size = 4 + 8 + 16 + 8 + data.len() as u32;
        out.extend_from_slice(&riff_size.to_le_bytes());
        out.extend_from_slice(b"WAVE");

        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&format.to_le_bytes());
        out.extend_from_slice(&channels.to_le_bytes());
        out.extend_from_slice(&rate.to_le_bytes());
        let block_align = channels * (bits / 8);
        let byte_rate = rate * block_align as u32;
        out.extend_from_slice(&byte_rate.to_le_bytes());
        out.extend_from_slice(&block_align.to_le_bytes());
        out.extend_from_slice(&bits.to_le_bytes());

        out.extend_from_slice(b"data");
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(data);
        out
    }

    #[test]
    fn parses_pcm16_header_and_samples() {
        let wav = pcm16_wave(&[1, -1, 1000, -32768, 32767]);
        let mut reader = WaveReader::new(Cursor::new(wav));
        let header = reader.get_header().unwrap();
        assert_eq!(header.format, FormatCode::Pcm);
        assert_eq!(header.bits_per_sample, 16);

        let mut dst = [0i16; 5];
        let n: usize = reader.read_samples(&mut dst).unwrap();
        assert_eq!(n, 5);
        assert_eq!(dst, [1, -1, 1000, -32768, 32767]);

        let mut trailing = [0i16; 1];
        assert_eq!(reader.read_samples(&mut trailing).unwrap(), 0);
    }

    #[test]
    fn unknown_chunk_between_fmt_and_data_is_skipped() {
        let mut data = Vec::new();
        for &s in &[5i16, -5, 42] {
            data.extend_from_slice(&s.to_le_bytes());
        }
        let mut wav = Vec::new();
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&0u32.to_le_bytes());
        wav.extend_from_slice(b"WAVE");
        wav.extend_from_slice(b"fmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes());
        wav.extend_from_slice(&16000u32.to_le_bytes());
        wav.extend_from_slice(&32000u32.to_le_bytes());
        wav.extend_from_slice(&2u16.to_le_bytes());
        wav.extend_from_slice(&16u16.to_le_bytes());
        wav.extend_from_slice(b"JUNK");
        wav.extend_from_slice(&3u32.to_le_bytes());
        wav.extend_from_slice(&[0xAA, 0xBB, 0xCC]);
        wav.extend_from_slice(&[0u8]); // pad byte for odd-sized chunk
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&(data.len() as u32).to_le_bytes());
        wav.extend_from_slice(&data);

        let mut reader = WaveReader::new(Cursor::new(wav));
        let mut dst = [0i16; 3];
        assert_eq!(reader.read_samples(&mut dst).unwrap(), 3);
        assert_eq!(dst, [5, -5, 42]);
    }

    #[test]
    fn extensible_pcm_matches_plain_pcm() {
        let mut data = Vec::new();
        for &s in &[1i16, 2, 3] {
            data.extend_from_slice(&s.to_le_bytes());
        }

        let mut wav = Vec::new();
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&0u32.to_le_bytes());
        wav.extend_from_slice(b"WAVE");
        wav.extend_from_slice(b"fmt ");
        wav.extend_from_slice(&40u32.to_le_bytes());
        wav.extend_from_slice(&WAVE_FORMAT_EXTENSIBLE.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes());
        wav.extend_from_slice(&16000u32.to_le_bytes());
        wav.extend_from_slice(&32000u32.to_le_bytes());
        wav.extend_from_slice(&2u16.to_le_bytes());
        wav.extend_from_slice(&16u16.to_le_bytes());
        wav.extend_from_slice(&22u16.to_le_bytes()); // cbSize
        wav.extend_from_slice(&16u16.to_le_bytes()); // valid bits
        wav.extend_from_slice(&0u32.to_le_bytes()); // channel mask
        wav.extend_from_slice(&1u16.to_le_bytes()); // sub-format = PCM
        wav.extend_from_slice(&[0u8; 14]); // GUID tail
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&(data.len() as u32).to_le_bytes());
        wav.extend_from_slice(&data);

        let mut reader = WaveReader::new(Cursor::new(wav));
        let header = reader.get_header().unwrap();
        assert_eq!(header.format, FormatCode::Pcm);

        let mut dst = [0i16; 3];
        assert_eq!(reader.read_samples(&mut dst).unwrap(), 3);
        assert_eq!(dst, [1, 2, 3]);
    }

    #[test]
    fn non_riff_input_is_bad_header() {
        let mut reader = WaveReader::new(Cursor::new(b"not a wave file".to_vec()));
        let mut dst = [0i16; 1];
        assert!(reader.read_samples(&mut dst).is_err());
    }

    #[test]
    fn empty_input_is_unexpected_eof() {
        let mut reader = WaveReader::new(Cursor::new(Vec::<u8>::new()));
        let mut dst = [0i16; 1];
        assert!(reader.read_samples(&mut dst).is_err());
    }

    #[test]
    fn data_before_fmt_is_bad_header() {
        let mut wav = Vec::new();
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&0u32.to_le_bytes());
        wav.extend_from_slice(b"WAVE");
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&4u32.to_le_bytes());
        wav.extend_from_slice(&[0u8; 4]);

        let mut reader = WaveReader::new(Cursor::new(wav));
        let mut dst = [0i16; 1];
        assert!(reader.read_samples(&mut dst).is_err());
    }

    #[test]
    fn truncated_data_chunk_is_unexpected_eof() {
        let mut wav = Vec::new();
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&0u32.to_le_bytes());
        wav.extend_from_slice(b"WAVE");
        wav.extend_from_slice(b"fmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes());
        wav.extend_from_slice(&16000u32.to_le_bytes());
        wav.extend_from_slice(&32000u32.to_le_bytes());
        wav.extend_from_slice(&2u16.to_le_bytes());
        wav.extend_from_slice(&16u16.to_le_bytes());
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&8u32.to_le_bytes()); // claims 8 bytes
        wav.extend_from_slice(&[0u8; 4]); // only 4 present

        let mut reader = WaveReader::new(Cursor::new(wav));
        let mut dst = [0i16; 4];
        assert!(reader.read_samples(&mut dst).is_err());
    }

    #[test]
    fn alaw_and_ulaw_decode_to_i16() {
        let mut wav_a = build_wave(6, 1, 8000, 8, &[0x55, 0xD5]);
        let mut reader = WaveReader::new(Cursor::new(std::mem::take(&mut wav_a)));
        let mut dst = [0i16; 2];
        assert_eq!(reader.read_samples(&mut dst).unwrap(), 2);

        let wav_u = build_wave(7, 1, 8000, 8, &[0xFF, 0x7F]);
        let mut reader = WaveReader::new(Cursor::new(wav_u));
        let mut dst = [0i16; 2];
        assert_eq!(reader.read_samples(&mut dst).unwrap(), 2);
    }

    #[test]
    fn float32_round_trips_near_original() {
        let mut data = Vec::new();
        for v in [0.0f32, 0.5, -0.5, 0.999] {
            data.extend_from_slice(&v.to_le_bytes());
        }
        let wav = build_wave(3, 1, 16000, 32, &data);
        let mut reader = WaveReader::new(Cursor::new(wav));
        let mut dst = [0.0f32; 4];
        assert_eq!(reader.read_samples(&mut dst).unwrap(), 4);
        for (got, want) in dst.iter().zip([0.0f32, 0.5, -0.5, 0.999]) {
            assert!((got - want).abs() < 1e-3, "{got} vs {want}");
        }
    }
}

//! WAV encoding and decoding for PCM audio.

use crate::FormatError;
use pt_model::AudioClip;
use pt_synth::f32_to_i16;
use std::io::Write;

const FORMAT_PCM: u16 = 1;
const FORMAT_IEEE_FLOAT: u16 = 3;
const FORMAT_EXTENSIBLE: u16 = 0xFFFE;

// --- Writing ---

/// Encode `clip` as 16-bit integer PCM with the clip's channel count.
pub fn write_wav(w: &mut impl Write, clip: &AudioClip) -> std::io::Result<()> {
    let num_channels = clip.channels();
    let bits_per_sample: u16 = 16;
    let block_align = num_channels * (bits_per_sample / 8);
    let data_size = clip.frames() as u32 * block_align as u32;

    write_riff_header(w, data_size)?;
    write_fmt_chunk(w, num_channels, clip.sample_rate(), block_align, bits_per_sample)?;
    write_data_chunk(w, clip, data_size)
}

pub fn clip_to_wav(clip: &AudioClip) -> Vec<u8> {
    let mut buf = Vec::new();
    write_wav(&mut buf, clip).expect("Vec<u8> write cannot fail");
    buf
}

fn write_riff_header(w: &mut impl Write, data_size: u32) -> std::io::Result<()> {
    w.write_all(b"RIFF")?;
    w.write_all(&(36 + data_size).to_le_bytes())?;
    w.write_all(b"WAVE")
}

fn write_fmt_chunk(
    w: &mut impl Write,
    num_channels: u16,
    sample_rate: u32,
    block_align: u16,
    bits_per_sample: u16,
) -> std::io::Result<()> {
    w.write_all(b"fmt ")?;
    w.write_all(&16u32.to_le_bytes())?;
    w.write_all(&FORMAT_PCM.to_le_bytes())?;
    w.write_all(&num_channels.to_le_bytes())?;
    w.write_all(&sample_rate.to_le_bytes())?;
    w.write_all(&(sample_rate * block_align as u32).to_le_bytes())?;
    w.write_all(&block_align.to_le_bytes())?;
    w.write_all(&bits_per_sample.to_le_bytes())
}

fn write_data_chunk(w: &mut impl Write, clip: &AudioClip, data_size: u32) -> std::io::Result<()> {
    w.write_all(b"data")?;
    w.write_all(&data_size.to_le_bytes())?;
    for frame in 0..clip.frames() {
        for ch in 0..clip.channels() {
            w.write_all(&f32_to_i16(clip.channel(ch)[frame]).to_le_bytes())?;
        }
    }
    Ok(())
}

// --- Reading ---

/// Decode a WAV file from raw bytes.
///
/// Accepts 8-bit and 16-bit integer PCM and 32-bit float, mono or stereo.
pub fn load_wav(data: &[u8]) -> Result<AudioClip, FormatError> {
    let header = parse_header(data)?;
    let end = (header.data_offset + header.data_size).min(data.len());
    let raw = &data[header.data_offset..end];

    let planes = match (header.format, header.bits_per_sample) {
        (FORMAT_PCM, 8) => deinterleave(raw, 1, header.num_channels, |b| {
            (b[0] as f32 - 128.0) / 128.0
        }),
        (FORMAT_PCM, 16) => deinterleave(raw, 2, header.num_channels, |b| {
            i16::from_le_bytes([b[0], b[1]]) as f32 / 32768.0
        }),
        (FORMAT_IEEE_FLOAT, 32) => deinterleave(raw, 4, header.num_channels, |b| {
            f32::from_le_bytes([b[0], b[1], b[2], b[3]])
        }),
        _ => return Err(header.unsupported()),
    };

    Ok(AudioClip::from_planes(planes, header.sample_rate))
}

struct WavHeader {
    format: u16,
    num_channels: u16,
    sample_rate: u32,
    bits_per_sample: u16,
    data_offset: usize,
    data_size: usize,
}

impl WavHeader {
    fn unsupported(&self) -> FormatError {
        FormatError::Unsupported {
            format: self.format,
            bits: self.bits_per_sample,
            channels: self.num_channels,
        }
    }
}

fn parse_header(data: &[u8]) -> Result<WavHeader, FormatError> {
    if data.len() < 44 {
        return Err(FormatError::UnexpectedEof);
    }
    if &data[0..4] != b"RIFF" || &data[8..12] != b"WAVE" {
        return Err(FormatError::InvalidHeader);
    }

    let mut pos = 12;
    let mut fmt: Option<(u16, u16, u32, u16)> = None;
    let mut data_chunk: Option<(usize, usize)> = None;

    while pos + 8 <= data.len() {
        let chunk_id = &data[pos..pos + 4];
        let chunk_size = read_u32_le(data, pos + 4) as usize;

        if chunk_id == b"fmt " && chunk_size >= 16 && pos + 24 <= data.len() {
            let mut format = read_u16_le(data, pos + 8);
            if format == FORMAT_EXTENSIBLE && chunk_size >= 40 && pos + 34 <= data.len() {
                // First two bytes of the sub-format GUID carry the real format tag
                format = read_u16_le(data, pos + 32);
            }
            let channels = read_u16_le(data, pos + 10);
            let rate = read_u32_le(data, pos + 12);
            let bits = read_u16_le(data, pos + 22);
            fmt = Some((format, channels, rate, bits));
        } else if chunk_id == b"data" {
            data_chunk = Some((pos + 8, chunk_size));
        }

        pos = pos.saturating_add(8).saturating_add(chunk_size);
        if pos % 2 != 0 {
            pos += 1;
        }
    }

    let (format, num_channels, sample_rate, bits_per_sample) =
        fmt.ok_or(FormatError::InvalidHeader)?;
    let (data_offset, data_size) = data_chunk.ok_or(FormatError::InvalidHeader)?;

    let header = WavHeader {
        format,
        num_channels,
        sample_rate,
        bits_per_sample,
        data_offset,
        data_size,
    };
    if !(1..=2).contains(&num_channels) {
        return Err(header.unsupported());
    }
    Ok(header)
}

/// Split interleaved sample bytes into one plane per channel.
fn deinterleave(
    raw: &[u8],
    bytes_per_sample: usize,
    channels: u16,
    decode: impl Fn(&[u8]) -> f32,
) -> Vec<Vec<f32>> {
    let channels = channels as usize;
    let block = bytes_per_sample * channels;
    let frames = raw.len() / block;
    let mut planes = vec![Vec::with_capacity(frames); channels];
    for chunk in raw.chunks_exact(block) {
        for (ch, plane) in planes.iter_mut().enumerate() {
            let start = ch * bytes_per_sample;
            plane.push(decode(&chunk[start..start + bytes_per_sample]));
        }
    }
    planes
}

fn read_u16_le(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}

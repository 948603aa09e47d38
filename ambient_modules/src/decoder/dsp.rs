// src/decoder/dsp.rs

pub fn deinterleave(interleaved: &[f32], channels: usize) -> Vec<Vec<f32>> {
    let mut planar = vec![Vec::with_capacity(interleaved.len() / channels.max(1)); channels];
    append_interleaved_to_planar(interleaved, &mut planar, channels);
    planar
}

pub fn append_interleaved_to_planar(interleaved: &[f32], planar: &mut [Vec<f32>], channels: usize) {
    if channels == 0 {
        return;
    }
    for frame in interleaved.chunks_exact(channels) {
        for (lane, &s) in planar.iter_mut().zip(frame) {
            lane.push(s);
        }
    }
}

/// Frames available in every lane.
pub fn planar_len(planar: &[Vec<f32>]) -> usize {
    planar.iter().map(Vec::len).min().unwrap_or(0)
}

/// Split the first `frames` frames off every lane.
pub fn take_from_planar(planar: &mut [Vec<f32>], frames: usize) -> Vec<Vec<f32>> {
    planar
        .iter_mut()
        .map(|lane| {
            let n = frames.min(lane.len());
            let tail = lane.split_off(n);
            std::mem::replace(lane, tail)
        })
        .collect()
}

pub fn interleave(planar: &[Vec<f32>]) -> Vec<f32> {
    let channels = planar.len();
    let frames = planar_len(planar);
    let mut out = Vec::with_capacity(frames * channels);
    for f in 0..frames {
        out.extend(planar.iter().map(|lane| lane[f]));
    }
    out
}

/// Convert interleaved audio between channel counts. Mono is duplicated,
/// stereo to mono averages, other downmixes average groups of adjacent
/// channels and other upmixes repeat channels cyclically.
pub fn updown_mix_interleaved(input: &[f32], in_ch: usize, out_ch: usize) -> Vec<f32> {
    if in_ch == out_ch || in_ch == 0 || out_ch == 0 {
        return input.to_vec();
    }
    let frames = input.len() / in_ch;
    let mut out = Vec::with_capacity(frames * out_ch);

    for frame in input.chunks_exact(in_ch) {
        match (in_ch, out_ch) {
            (1, _) => out.extend(std::iter::repeat_n(frame[0], out_ch)),
            (2, 1) => out.push(0.5 * (frame[0] + frame[1])),
            _ if out_ch < in_ch => {
                let factor = in_ch as f32 / out_ch as f32;
                for oc in 0..out_ch {
                    let start = (oc as f32 * factor).floor() as usize;
                    let end = (((oc + 1) as f32 * factor).ceil() as usize).min(in_ch);
                    let group = &frame[start..end];
                    out.push(group.iter().sum::<f32>() / group.len().max(1) as f32);
                }
            }
            _ => out.extend((0..out_ch).map(|oc| frame[oc % in_ch])),
        }
    }

    out
}

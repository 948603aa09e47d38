// src/decoder/resample.rs

use anyhow::Result;
use rubato::{
    calculate_cutoff, Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType,
    WindowFunction,
};

use crate::decoder::dsp;

pub fn build_resampler(src_rate: u32, dst_rate: u32, channels: usize) -> Result<Option<SincFixedIn<f32>>> {
    if src_rate == dst_rate {
        return Ok(None);
    }
    let ratio = dst_rate as f64 / src_rate as f64;
    let sinc_len = 256usize;
    let window = WindowFunction::BlackmanHarris2;
    let params = SincInterpolationParameters {
        sinc_len,
        f_cutoff: calculate_cutoff(sinc_len, window),
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 128,
        window,
    };
    let chunk_size = 1024;
    Ok(Some(SincFixedIn::<f32>::new(ratio, 2.0, params, chunk_size, channels)?))
}

/// Run one full chunk through the resampler if enough input is staged.
pub fn try_process_exact(resampler: &mut SincFixedIn<f32>, stage: &mut [Vec<f32>]) -> Result<Option<Vec<Vec<f32>>>> {
    let need = resampler.input_frames_next();
    if dsp::planar_len(stage) < need {
        return Ok(None);
    }
    let block = dsp::take_from_planar(stage, need);
    Ok(Some(resampler.process(&block, None)?))
}

/// Resample a whole interleaved buffer. The output is trimmed of the
/// filter delay and cut to the length implied by the rate ratio.
pub fn resample_interleaved(input: &[f32], channels: usize, src_rate: u32, dst_rate: u32) -> Result<Vec<f32>> {
    let Some(mut resampler) = build_resampler(src_rate, dst_rate, channels)? else {
        return Ok(input.to_vec());
    };

    let in_frames = input.len() / channels.max(1);
    let expected = (in_frames as f64 * dst_rate as f64 / src_rate as f64).round() as usize;
    let delay = resampler.output_delay();

    let mut stage = dsp::deinterleave(input, channels);
    let mut collected: Vec<Vec<f32>> = vec![Vec::with_capacity(expected + delay); channels];

    while let Some(block) = try_process_exact(&mut resampler, &mut stage)? {
        append_planar(&mut collected, block);
    }
    if dsp::planar_len(&stage) > 0 {
        let rest = dsp::take_from_planar(&mut stage, usize::MAX);
        append_planar(&mut collected, resampler.process_partial(Some(rest.as_slice()), None)?);
    }
    // Flush what the filter still holds.
    while dsp::planar_len(&collected) < expected + delay {
        let tail = resampler.process_partial::<Vec<f32>>(None, None)?;
        if dsp::planar_len(&tail) == 0 {
            break;
        }
        append_planar(&mut collected, tail);
    }

    for lane in &mut collected {
        let end = (delay + expected).min(lane.len());
        let start = delay.min(end);
        *lane = lane[start..end].to_vec();
    }
    Ok(dsp::interleave(&collected))
}

fn append_planar(collected: &mut [Vec<f32>], block: Vec<Vec<f32>>) {
    for (lane, out) in collected.iter_mut().zip(block) {
        lane.extend(out);
    }
}

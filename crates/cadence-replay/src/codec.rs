//! Binary encode/decode for the `.mtr` replay format.
//!
//! All integers are little-endian. Strings are UTF-8 prefixed with an
//! unsigned LEB128 byte length. Sections are prefixed with a `u32` byte
//! length and must be consumed exactly.
//!
//! Decoding validates in a fixed order: length, magic, version, checksum,
//! then section contents (param order, identity fields, tick totals). A
//! single flipped bit anywhere after the version field therefore always
//! surfaces as a checksum mismatch, never as a confusing parse error.

use std::io::{self, Read, Write};

use cadence_core::hash::fnv1a;
use cadence_core::run::cmp_ordinal;
use cadence_core::{
    varint, DifficultyTier, InputSample, InputSpan, InputTrace, ModeId, MutatorId, MutatorParam,
    MutatorSpec, RunDescriptor, VarintError, VerificationHash,
};
use tracing::{debug, warn};

use crate::error::ReplayError;
use crate::types::ReplayEnvelope;
use crate::{FORMAT_VERSION, MAGIC, MIN_ENVELOPE_LEN};

const CHECKSUM_LEN: usize = 8;

// ── Primitive writers ───────────────────────────────────────────

/// Write a single byte.
pub fn write_u8(w: &mut dyn Write, v: u8) -> Result<(), ReplayError> {
    w.write_all(&[v])?;
    Ok(())
}

/// Write a little-endian u16.
pub fn write_u16_le(w: &mut dyn Write, v: u16) -> Result<(), ReplayError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian u32.
pub fn write_u32_le(w: &mut dyn Write, v: u32) -> Result<(), ReplayError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian u64.
pub fn write_u64_le(w: &mut dyn Write, v: u64) -> Result<(), ReplayError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian i16.
pub fn write_i16_le(w: &mut dyn Write, v: i16) -> Result<(), ReplayError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian i32.
pub fn write_i32_le(w: &mut dyn Write, v: i32) -> Result<(), ReplayError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian f32.
pub fn write_f32_le(w: &mut dyn Write, v: f32) -> Result<(), ReplayError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a varint-length-prefixed UTF-8 string.
pub fn write_str(w: &mut dyn Write, s: &str) -> Result<(), ReplayError> {
    let len = u32::try_from(s.len()).map_err(|_| ReplayError::malformed("string longer than u32::MAX"))?;
    varint::write_u32(w, len)?;
    w.write_all(s.as_bytes())?;
    Ok(())
}

// ── Primitive readers ───────────────────────────────────────────

fn read_array<const N: usize>(r: &mut dyn Read) -> Result<[u8; N], ReplayError> {
    let mut buf = [0u8; N];
    r.read_exact(&mut buf)?;
    Ok(buf)
}

/// Read a single byte.
pub fn read_u8(r: &mut dyn Read) -> Result<u8, ReplayError> {
    Ok(read_array::<1>(r)?[0])
}

/// Read a little-endian u16.
pub fn read_u16_le(r: &mut dyn Read) -> Result<u16, ReplayError> {
    Ok(u16::from_le_bytes(read_array(r)?))
}

/// Read a little-endian u32.
pub fn read_u32_le(r: &mut dyn Read) -> Result<u32, ReplayError> {
    Ok(u32::from_le_bytes(read_array(r)?))
}

/// Read a little-endian u64.
pub fn read_u64_le(r: &mut dyn Read) -> Result<u64, ReplayError> {
    Ok(u64::from_le_bytes(read_array(r)?))
}

/// Read a little-endian i16.
pub fn read_i16_le(r: &mut dyn Read) -> Result<i16, ReplayError> {
    Ok(i16::from_le_bytes(read_array(r)?))
}

/// Read a little-endian i32.
pub fn read_i32_le(r: &mut dyn Read) -> Result<i32, ReplayError> {
    Ok(i32::from_le_bytes(read_array(r)?))
}

/// Read a little-endian f32.
pub fn read_f32_le(r: &mut dyn Read) -> Result<f32, ReplayError> {
    Ok(f32::from_le_bytes(read_array(r)?))
}

/// Read a varint-length-prefixed UTF-8 string.
pub fn read_str(r: &mut dyn Read) -> Result<String, ReplayError> {
    let len = varint::read_u32(r)? as usize;
    let mut buf = Vec::new();
    Read::take(r, len as u64).read_to_end(&mut buf)?;
    if buf.len() != len {
        return Err(ReplayError::malformed("string runs past end of section"));
    }
    String::from_utf8(buf).map_err(|e| ReplayError::malformed(format!("invalid UTF-8 string: {e}")))
}

// ── Sections ────────────────────────────────────────────────────

/// Encode the run section body: descriptor fields plus FixedHz.
pub fn encode_run_section(
    w: &mut dyn Write,
    run: &RunDescriptor,
    fixed_hz: u16,
) -> Result<(), ReplayError> {
    write_str(w, run.mode().as_str())?;
    write_u32_le(w, run.seed())?;
    write_u8(w, run.difficulty().as_u8())?;
    write_u16_le(w, run.generator_version())?;
    write_u16_le(w, run.ruleset_version())?;
    write_u16_le(w, fixed_hz)?;
    varint::write_u32(w, run.mutators().len() as u32)?;
    for spec in run.mutators() {
        write_str(w, spec.id().as_str())?;
        write_u16_le(w, spec.version())?;
        varint::write_u32(w, spec.params().len() as u32)?;
        for p in spec.params() {
            write_str(w, &p.name)?;
            write_f32_le(w, p.value)?;
        }
    }
    Ok(())
}

/// Decode the run section body, recomputing the RunId.
pub fn decode_run_section(r: &mut dyn Read) -> Result<(RunDescriptor, u16), ReplayError> {
    let mode = ModeId::new(read_str(r)?);
    let seed = read_u32_le(r)?;
    let difficulty_byte = read_u8(r)?;
    let difficulty = DifficultyTier::from_u8(difficulty_byte).ok_or(ReplayError::UnknownDifficulty {
        found: difficulty_byte,
    })?;
    let generator_version = read_u16_le(r)?;
    let ruleset_version = read_u16_le(r)?;
    let fixed_hz = read_u16_le(r)?;

    let mutator_count = varint::read_u32(r)?;
    let mut mutators = Vec::new();
    for _ in 0..mutator_count {
        let id = MutatorId::new(read_str(r)?);
        let version = read_u16_le(r)?;
        let param_count = varint::read_u32(r)?;
        let mut params: Vec<MutatorParam> = Vec::new();
        for _ in 0..param_count {
            let name = read_str(r)?;
            let value = read_f32_le(r)?;
            if let Some(prev) = params.last() {
                if cmp_ordinal(&name, &prev.name).is_le() {
                    return Err(ReplayError::UnsortedParams {
                        mutator: id.to_string(),
                        name,
                    });
                }
            }
            params.push(MutatorParam { name, value });
        }
        mutators.push(MutatorSpec::new(id, version as u32, params)?);
    }

    let run = RunDescriptor::builder(mode, seed)
        .difficulty(difficulty)
        .generator_version(generator_version as u32)
        .ruleset_version(ruleset_version as u32)
        .mutators(mutators)
        .build()?;
    Ok((run, fixed_hz))
}

/// Encode the input trace section body.
pub fn encode_trace_section(w: &mut dyn Write, trace: &InputTrace) -> Result<(), ReplayError> {
    write_u32_le(w, trace.total_ticks())?;
    varint::write_u32(w, trace.spans().len() as u32)?;
    for span in trace.spans() {
        varint::write_u32(w, span.duration)?;
        write_i16_le(w, span.sample.x)?;
        write_i16_le(w, span.sample.y)?;
        write_u8(w, span.sample.buttons)?;
    }
    Ok(())
}

/// Decode the input trace section body, checking the declared total.
pub fn decode_trace_section(r: &mut dyn Read) -> Result<InputTrace, ReplayError> {
    let total_ticks = read_u32_le(r)?;
    let span_count = varint::read_u32(r)?;
    let mut spans = Vec::new();
    for _ in 0..span_count {
        let duration = varint::read_u32(r)?;
        let sample = InputSample {
            x: read_i16_le(r)?,
            y: read_i16_le(r)?,
            buttons: read_u8(r)?,
        };
        spans.push(InputSpan { sample, duration });
    }
    Ok(InputTrace::with_declared_total(total_ticks, spans)?)
}

fn write_section(
    w: &mut dyn Write,
    body: impl FnOnce(&mut dyn Write) -> Result<(), ReplayError>,
) -> Result<(), ReplayError> {
    let mut buf = Vec::new();
    body(&mut buf)?;
    let len = u32::try_from(buf.len()).map_err(|_| ReplayError::malformed("section longer than u32::MAX"))?;
    write_u32_le(w, len)?;
    w.write_all(&buf)?;
    Ok(())
}

fn read_section<T>(
    r: &mut &[u8],
    name: &str,
    body: impl FnOnce(&mut dyn Read) -> Result<T, ReplayError>,
) -> Result<T, ReplayError> {
    let len = read_u32_le(r)? as usize;
    if len > r.len() {
        return Err(ReplayError::malformed(format!(
            "{name} section length {len} exceeds remaining {} bytes",
            r.len()
        )));
    }
    let (mut section, rest) = r.split_at(len);
    *r = rest;
    let value = body(&mut section).map_err(|e| truncated_as_malformed(e, name))?;
    if !section.is_empty() {
        return Err(ReplayError::malformed(format!(
            "{name} section has {} unread trailing bytes",
            section.len()
        )));
    }
    Ok(value)
}

/// Running off the end of an in-memory section is damage, reported as
/// [`ReplayError::Malformed`].
fn truncated_as_malformed(err: ReplayError, name: &str) -> ReplayError {
    match err {
        ReplayError::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            ReplayError::malformed(format!("{name} section truncated"))
        }
        ReplayError::Varint(VarintError::UnexpectedEof) => {
            ReplayError::malformed(format!("{name} section truncated"))
        }
        other => other,
    }
}

// ── Envelope encode/decode ──────────────────────────────────────

/// Encode an envelope to bytes, checksum included.
pub fn encode(env: &ReplayEnvelope) -> Result<Vec<u8>, ReplayError> {
    let mut out = Vec::with_capacity(64 + env.trace.spans().len() * 6);
    out.extend_from_slice(&MAGIC);
    write_u16_le(&mut out, FORMAT_VERSION)?;
    write_u16_le(&mut out, 0)?;
    write_section(&mut out, |w| encode_run_section(w, &env.run, env.fixed_hz))?;
    write_section(&mut out, |w| encode_trace_section(w, &env.trace))?;
    write_i32_le(&mut out, env.final_score)?;
    write_i32_le(&mut out, env.final_max_combo)?;
    write_u64_le(&mut out, env.hash.0)?;
    let checksum = fnv1a(&out);
    write_u64_le(&mut out, checksum)?;
    debug!(
        bytes = out.len(),
        run_id = %env.run_id(),
        ticks = env.total_ticks(),
        "replay encoded"
    );
    Ok(out)
}

/// Encode an envelope into a writer.
pub fn write_to(w: &mut dyn Write, env: &ReplayEnvelope) -> Result<(), ReplayError> {
    w.write_all(&encode(env)?)?;
    Ok(())
}

/// Decode and fully validate an envelope.
///
/// # Errors
///
/// In check order: [`ReplayError::TooShort`], [`ReplayError::BadMagic`],
/// [`ReplayError::UnsupportedVersion`], [`ReplayError::ChecksumMismatch`],
/// then content errors ([`ReplayError::UnsortedParams`],
/// [`ReplayError::Identity`], [`ReplayError::Trace`],
/// [`ReplayError::Malformed`], ...).
pub fn decode(bytes: &[u8]) -> Result<ReplayEnvelope, ReplayError> {
    decode_inner(bytes).inspect_err(|e| {
        warn!(category = e.category(), error = %e, bytes = bytes.len(), "replay rejected");
    })
}

fn decode_inner(bytes: &[u8]) -> Result<ReplayEnvelope, ReplayError> {
    if bytes.len() < MIN_ENVELOPE_LEN {
        return Err(ReplayError::TooShort { len: bytes.len() });
    }
    let mut found = [0u8; 4];
    found.copy_from_slice(&bytes[..4]);
    if found != MAGIC {
        return Err(ReplayError::BadMagic { found });
    }
    let version = u16::from_le_bytes([bytes[4], bytes[5]]);
    if version != FORMAT_VERSION {
        return Err(ReplayError::UnsupportedVersion { found: version });
    }
    let (payload, tail) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
    let mut stored = [0u8; CHECKSUM_LEN];
    stored.copy_from_slice(tail);
    let stored = u64::from_le_bytes(stored);
    let computed = fnv1a(payload);
    if stored != computed {
        return Err(ReplayError::ChecksumMismatch { stored, computed });
    }

    // Flags (bytes 6..8) are reserved and ignored.
    let mut r: &[u8] = &payload[8..];
    let (run, fixed_hz) = read_section(&mut r, "run", decode_run_section)?;
    let trace = read_section(&mut r, "trace", decode_trace_section)?;
    let (final_score, final_max_combo, hash) = read_footer(&mut r)
        .map_err(|e| truncated_as_malformed(e, "footer"))?;
    if !r.is_empty() {
        return Err(ReplayError::malformed(format!(
            "{} unexpected bytes before checksum",
            r.len()
        )));
    }

    let env = ReplayEnvelope {
        run,
        fixed_hz,
        trace,
        hash,
        final_score,
        final_max_combo,
    };
    debug!(
        bytes = bytes.len(),
        run_id = %env.run_id(),
        ticks = env.total_ticks(),
        "replay decoded"
    );
    Ok(env)
}

fn read_footer(r: &mut &[u8]) -> Result<(i32, i32, VerificationHash), ReplayError> {
    let final_score = read_i32_le(r)?;
    let final_max_combo = read_i32_le(r)?;
    let hash = VerificationHash(read_u64_le(r)?);
    Ok((final_score, final_max_combo, hash))
}

/// Read an entire stream and decode it.
pub fn read_from(r: &mut dyn Read) -> Result<ReplayEnvelope, ReplayError> {
    let mut bytes = Vec::new();
    r.read_to_end(&mut bytes)?;
    decode(&bytes)
}

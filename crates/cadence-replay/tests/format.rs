//! Wire-format integration tests: golden bytes, round trips, and
//! rejection of damaged files.

use cadence_core::hash::fnv1a;
use cadence_core::{
    DifficultyTier, InputSample, InputTrace, ModeId, MutatorId, MutatorParam, MutatorSpec,
    RunDescriptor, TraceError, VerificationHash,
};
use cadence_replay::{decode, encode, ReplayEnvelope, ReplayError, FORMAT_VERSION, MIN_ENVELOPE_LEN};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────

const GOLDEN_HEX: &str = "4D54525001000000180000000B5265666C65784761746573EEFFC0000001000100\
3C00000B000000010000000101802518150000000000000000000000000000000000432BAB8D35BD3F0B";

fn hex(s: &str) -> Vec<u8> {
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
        .collect()
}

fn minimal_envelope() -> ReplayEnvelope {
    ReplayEnvelope {
        run: RunDescriptor::create(ModeId::REFLEX_GATES, 0xC0FFEE).unwrap(),
        fixed_hz: 60,
        trace: InputTrace::from_samples([InputSample::quantize(960.0, 540.0, false, false)])
            .unwrap(),
        hash: VerificationHash(0),
        final_score: 0,
        final_max_combo: 0,
    }
}

fn mutated_envelope() -> ReplayEnvelope {
    let run = RunDescriptor::builder(ModeId::REFLEX_GATES, 42)
        .difficulty(DifficultyTier::Hard)
        .generator_version(3)
        .ruleset_version(7)
        .mutator(
            MutatorSpec::new(
                MutatorId::SEGMENT_BIAS,
                1,
                vec![MutatorParam::new("shape", 2.0), MutatorParam::new("amount", 0.5)],
            )
            .unwrap(),
        )
        .mutator(MutatorSpec::new(MutatorId::NARROW_MARGIN, 1, vec![]).unwrap())
        .build()
        .unwrap();
    let samples = (0..300).map(|i| InputSample::quantize(i as f32, 540.0, i % 50 < 5, false));
    ReplayEnvelope {
        run,
        fixed_hz: 120,
        trace: InputTrace::from_samples(samples).unwrap(),
        hash: VerificationHash(0xDEAD_BEEF_0BAD_F00D),
        final_score: 1234,
        final_max_combo: 9,
    }
}

/// Rewrite the trailing checksum so only content validation can fail.
fn reseal(bytes: &mut [u8]) {
    let split = bytes.len() - 8;
    let checksum = fnv1a(&bytes[..split]);
    bytes[split..].copy_from_slice(&checksum.to_le_bytes());
}

// ── Golden vector ───────────────────────────────────────────────

#[test]
fn minimal_envelope_matches_golden_bytes() {
    let bytes = encode(&minimal_envelope()).unwrap();
    assert_eq!(bytes.len(), 75);
    assert_eq!(bytes, hex(GOLDEN_HEX));
}

#[test]
fn golden_bytes_decode_to_minimal_envelope() {
    let env = decode(&hex(GOLDEN_HEX)).unwrap();
    assert_eq!(env, minimal_envelope());
    assert_eq!(env.run_id().0, 0x1FF2_3198_ADEE_F213);
}

#[test]
fn reencoding_decoded_bytes_is_identical() {
    let bytes = encode(&mutated_envelope()).unwrap();
    let again = encode(&decode(&bytes).unwrap()).unwrap();
    assert_eq!(bytes, again);
}

#[test]
fn run_id_is_recomputed_on_decode() {
    let env = mutated_envelope();
    let decoded = decode(&encode(&env).unwrap()).unwrap();
    assert_eq!(decoded.run_id(), env.run_id());
    assert_ne!(decoded.run_id(), minimal_envelope().run_id());
}

#[test]
fn stream_helpers_match_byte_helpers() {
    let env = mutated_envelope();
    let mut buf = Vec::new();
    cadence_replay::codec::write_to(&mut buf, &env).unwrap();
    assert_eq!(buf, encode(&env).unwrap());
    let back = cadence_replay::codec::read_from(&mut buf.as_slice()).unwrap();
    assert_eq!(back, env);
}

// ── Rejection ───────────────────────────────────────────────────

#[test]
fn short_input_is_too_short() {
    let bytes = encode(&minimal_envelope()).unwrap();
    for len in [0, 4, MIN_ENVELOPE_LEN - 1] {
        let err = decode(&bytes[..len]).unwrap_err();
        assert!(matches!(err, ReplayError::TooShort { len: l } if l == len), "{err}");
    }
}

#[test]
fn truncated_file_fails_checksum() {
    let bytes = encode(&minimal_envelope()).unwrap();
    let err = decode(&bytes[..bytes.len() - 1]).unwrap_err();
    assert!(matches!(err, ReplayError::ChecksumMismatch { .. }), "{err}");
}

#[test]
fn damaged_magic_is_bad_magic() {
    for i in 0..4 {
        let mut bytes = encode(&minimal_envelope()).unwrap();
        bytes[i] ^= 0x20;
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, ReplayError::BadMagic { .. }), "{err}");
        assert!(err.to_string().contains("magic"));
    }
}

#[test]
fn other_version_is_unsupported_even_when_resealed() {
    let mut bytes = encode(&minimal_envelope()).unwrap();
    bytes[4..6].copy_from_slice(&(FORMAT_VERSION + 1).to_le_bytes());
    reseal(&mut bytes);
    let err = decode(&bytes).unwrap_err();
    assert!(matches!(err, ReplayError::UnsupportedVersion { found: 2 }), "{err}");
}

#[test]
fn total_ticks_mismatch_is_rejected() {
    let mut bytes = encode(&minimal_envelope()).unwrap();
    // Header, run section, then the trace section's own length prefix.
    let total_at = 8 + 4 + 0x18 + 4;
    assert_eq!(&bytes[total_at..total_at + 4], &1u32.to_le_bytes());
    bytes[total_at..total_at + 4].copy_from_slice(&2u32.to_le_bytes());
    reseal(&mut bytes);
    let err = decode(&bytes).unwrap_err();
    assert!(
        matches!(
            err,
            ReplayError::Trace(TraceError::TotalTicksMismatch {
                declared: 2,
                summed: 1
            })
        ),
        "{err}"
    );
    assert!(err.to_string().contains("TotalTicks"));
}

#[test]
fn trailing_garbage_is_malformed() {
    let mut bytes = encode(&minimal_envelope()).unwrap();
    let checksum_at = bytes.len() - 8;
    bytes.insert(checksum_at, 0);
    reseal(&mut bytes);
    let err = decode(&bytes).unwrap_err();
    assert!(matches!(err, ReplayError::Malformed { .. }), "{err}");
}

#[test]
fn unknown_difficulty_byte_is_malformed() {
    let mut bytes = encode(&minimal_envelope()).unwrap();
    // Header, run length, "ReflexGates" with its prefix, then the seed.
    let at = 8 + 4 + 1 + 11 + 4;
    assert_eq!(bytes[at], DifficultyTier::Standard.as_u8());
    bytes[at] = 0xEE;
    reseal(&mut bytes);

    let err = decode(&bytes).unwrap_err();
    assert!(matches!(err, ReplayError::UnknownDifficulty { found: 0xEE }), "{err}");
    assert_eq!(err.category(), "malformed");
}

/// Byte offset of the trace section's length prefix.
fn trace_length_at(bytes: &[u8]) -> usize {
    let run_len = u32::from_le_bytes(bytes[8..12].try_into().unwrap()) as usize;
    12 + run_len
}

#[test]
fn short_trace_section_is_malformed_not_io() {
    let mut bytes = encode(&mutated_envelope()).unwrap();
    let at = trace_length_at(&bytes);
    let trace_len = u32::from_le_bytes(bytes[at..at + 4].try_into().unwrap()) as usize;
    // Drop the last span's button byte and shrink the prefix to match.
    bytes[at..at + 4].copy_from_slice(&(trace_len as u32 - 1).to_le_bytes());
    bytes.remove(at + 4 + trace_len - 1);
    reseal(&mut bytes);

    let err = decode(&bytes).unwrap_err();
    assert!(matches!(err, ReplayError::Malformed { .. }), "{err}");
    assert_eq!(err.category(), "malformed");
    assert!(err.to_string().contains("trace section truncated"), "{err}");
}

#[test]
fn short_footer_is_malformed_not_io() {
    let mut bytes = encode(&mutated_envelope()).unwrap();
    let checksum_at = bytes.len() - 8;
    bytes.remove(checksum_at - 1);
    reseal(&mut bytes);

    let err = decode(&bytes).unwrap_err();
    assert!(matches!(err, ReplayError::Malformed { .. }), "{err}");
    assert!(err.to_string().contains("footer section truncated"), "{err}");
}

#[test]
fn flags_are_ignored() {
    let mut bytes = encode(&minimal_envelope()).unwrap();
    bytes[6] = 0xFF;
    reseal(&mut bytes);
    assert_eq!(decode(&bytes).unwrap(), minimal_envelope());
}

// ── Properties ──────────────────────────────────────────────────

fn arb_sample() -> impl Strategy<Value = InputSample> {
    (any::<i16>(), any::<i16>(), 0u8..4).prop_map(|(x, y, buttons)| InputSample { x, y, buttons })
}

fn arb_spec() -> impl Strategy<Value = MutatorSpec> {
    (
        "[A-Za-z]{1,12}",
        0u32..=u16::MAX as u32,
        prop::collection::btree_map("[a-z_]{1,8}", -1000.0f32..1000.0, 0..4),
    )
        .prop_map(|(id, version, params)| {
            let params: Vec<_> = params.into_iter().map(|(n, v)| MutatorParam::new(n, v)).collect();
            MutatorSpec::new(MutatorId::new(id), version, params).unwrap()
        })
}

fn arb_envelope() -> impl Strategy<Value = ReplayEnvelope> {
    (
        "[A-Za-z]{1,16}",
        any::<u32>(),
        0u8..3,
        prop::collection::vec(arb_spec(), 0..4),
        1u16..=240,
        prop::collection::vec((arb_sample(), 1u32..50), 0..40),
        any::<u64>(),
        any::<i32>(),
        any::<i32>(),
    )
        .prop_map(|(mode, seed, tier, specs, fixed_hz, runs, hash, score, combo)| {
            let run = RunDescriptor::builder(ModeId::new(mode), seed)
                .difficulty(DifficultyTier::from_u8(tier).unwrap())
                .mutators(specs)
                .build()
                .unwrap();
            let samples = runs
                .into_iter()
                .flat_map(|(s, n)| std::iter::repeat_n(s, n as usize));
            ReplayEnvelope {
                run,
                fixed_hz,
                trace: InputTrace::from_samples(samples).unwrap(),
                hash: VerificationHash(hash),
                final_score: score,
                final_max_combo: combo,
            }
        })
}

proptest! {
    #[test]
    fn decode_inverts_encode(env in arb_envelope()) {
        let bytes = encode(&env).unwrap();
        let back = decode(&bytes).unwrap();
        prop_assert_eq!(&back, &env);
        prop_assert_eq!(encode(&back).unwrap(), bytes);
    }

    #[test]
    fn any_flipped_payload_bit_is_caught(env in arb_envelope(), pick in any::<prop::sample::Index>(), bit in 0u8..8) {
        let mut bytes = encode(&env).unwrap();
        // Past magic and version, before the checksum.
        let span = bytes.len() - 8 - 6;
        let at = 6 + pick.index(span);
        bytes[at] ^= 1 << bit;
        let err = decode(&bytes).unwrap_err();
        prop_assert!(matches!(err, ReplayError::ChecksumMismatch { .. }), "{}", err);
    }
}

//! Lossless encoding of resource identities into transportable handles.
//!
//! Every identity fits a `u64`: a 2-bit kind tag in the top bits and the
//! raw index in the low 32. The tag makes cross-kind decoding a fail-fast
//! error instead of silent identity corruption, and the raw bit layout
//! stays private to this module — nothing else in the engine interprets
//! handle bits.

use tessera_arch::{PipId, SiteId, WireId};

const KIND_SHIFT: u32 = 62;
const KIND_SITE: u64 = 0b01;
const KIND_WIRE: u64 = 0b10;
const KIND_PIP: u64 = 0b11;
const PAYLOAD_MASK: u64 = u32::MAX as u64;

/// The distinguished handle standing for "no identity".
///
/// `u64::MAX` never collides with a valid encoding: valid handles carry
/// their payload in the low 32 bits and zeros in bits 32..62.
pub const NULL_HANDLE: u64 = u64::MAX;

fn decode(handle: u64, kind: u64, kind_name: &str) -> u32 {
    assert_ne!(
        handle, NULL_HANDLE,
        "null handle passed where a {kind_name} was required"
    );
    assert_eq!(
        handle >> KIND_SHIFT,
        kind,
        "handle {handle:#018x} is not a {kind_name} handle"
    );
    assert_eq!(
        handle & !(kind << KIND_SHIFT) & !PAYLOAD_MASK,
        0,
        "handle {handle:#018x} has garbage in its reserved bits"
    );
    (handle & PAYLOAD_MASK) as u32
}

/// Encodes a site identity into a transportable handle.
pub fn encode_site(site: SiteId) -> u64 {
    (KIND_SITE << KIND_SHIFT) | site.as_raw() as u64
}

/// Decodes a site handle.
///
/// # Panics
///
/// Panics on the null handle, a handle of another kind, or a malformed
/// handle — all caller contract violations.
pub fn decode_site(handle: u64) -> SiteId {
    SiteId::from_raw(decode(handle, KIND_SITE, "site"))
}

/// Encodes a wire identity into a transportable handle.
pub fn encode_wire(wire: WireId) -> u64 {
    (KIND_WIRE << KIND_SHIFT) | wire.as_raw() as u64
}

/// Decodes a wire handle.
///
/// # Panics
///
/// Panics on the null handle, a handle of another kind, or a malformed
/// handle.
pub fn decode_wire(handle: u64) -> WireId {
    WireId::from_raw(decode(handle, KIND_WIRE, "wire"))
}

/// Encodes a pip identity into a transportable handle.
pub fn encode_pip(pip: PipId) -> u64 {
    (KIND_PIP << KIND_SHIFT) | pip.as_raw() as u64
}

/// Decodes a pip handle.
///
/// # Panics
///
/// Panics on the null handle, a handle of another kind, or a malformed
/// handle.
pub fn decode_pip(handle: u64) -> PipId {
    PipId::from_raw(decode(handle, KIND_PIP, "pip"))
}

/// Encodes an optional wire identity, mapping `None` to [`NULL_HANDLE`].
pub fn encode_opt_wire(wire: Option<WireId>) -> u64 {
    wire.map_or(NULL_HANDLE, encode_wire)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_roundtrip() {
        for raw in [0, 1, 42, u32::MAX] {
            let site = SiteId::from_raw(raw);
            assert_eq!(decode_site(encode_site(site)), site);
        }
    }

    #[test]
    fn wire_roundtrip() {
        for raw in [0, 7, 123_456, u32::MAX] {
            let wire = WireId::from_raw(raw);
            assert_eq!(decode_wire(encode_wire(wire)), wire);
        }
    }

    #[test]
    fn pip_roundtrip() {
        for raw in [0, 99, u32::MAX] {
            let pip = PipId::from_raw(raw);
            assert_eq!(decode_pip(encode_pip(pip)), pip);
        }
    }

    #[test]
    fn kinds_never_collide() {
        let site = encode_site(SiteId::from_raw(5));
        let wire = encode_wire(WireId::from_raw(5));
        let pip = encode_pip(PipId::from_raw(5));
        assert_ne!(site, wire);
        assert_ne!(wire, pip);
        assert_ne!(site, pip);
    }

    #[test]
    fn null_handle_is_no_valid_encoding() {
        assert_ne!(encode_site(SiteId::from_raw(u32::MAX)), NULL_HANDLE);
        assert_ne!(encode_wire(WireId::from_raw(u32::MAX)), NULL_HANDLE);
        assert_ne!(encode_pip(PipId::from_raw(u32::MAX)), NULL_HANDLE);
    }

    #[test]
    fn encode_opt_wire_maps_none_to_null() {
        assert_eq!(encode_opt_wire(None), NULL_HANDLE);
        let wire = WireId::from_raw(3);
        assert_eq!(decode_wire(encode_opt_wire(Some(wire))), wire);
    }

    #[test]
    #[should_panic(expected = "not a wire handle")]
    fn cross_kind_decode_panics() {
        decode_wire(encode_site(SiteId::from_raw(0)));
    }

    #[test]
    #[should_panic(expected = "not a site handle")]
    fn pip_as_site_panics() {
        decode_site(encode_pip(PipId::from_raw(0)));
    }

    #[test]
    #[should_panic(expected = "null handle")]
    fn null_decode_panics() {
        decode_pip(NULL_HANDLE);
    }

    #[test]
    #[should_panic(expected = "garbage in its reserved bits")]
    fn malformed_handle_panics() {
        decode_site((KIND_SITE << KIND_SHIFT) | (1 << 40) | 7);
    }
}

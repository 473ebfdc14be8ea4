//! OSC packet codec for touch batches.
//!
//! A batch is one OSC message with a single string argument holding the
//! JSON-encoded touch array.

use rosc::{OscMessage, OscPacket, OscType};

use touchfabric_common::error::{TouchFabricError, TouchFabricResult};
use touchfabric_model::touch::{decode_batch, Touch};

/// Encode a message with one string argument.
pub fn encode_message(address: &str, payload: &str) -> TouchFabricResult<Vec<u8>> {
    let packet = OscPacket::Message(OscMessage {
        addr: address.to_string(),
        args: vec![OscType::String(payload.to_string())],
    });
    rosc::encoder::encode(&packet)
        .map_err(|e| TouchFabricError::transport(format!("OSC encode failed: {e:?}")))
}

/// Decode a UDP datagram into `(address, string arguments)` pairs.
///
/// Bundles are flattened in order; non-string arguments are skipped.
pub fn decode_messages(datagram: &[u8]) -> TouchFabricResult<Vec<(String, Vec<String>)>> {
    let (_, packet) = rosc::decoder::decode_udp(datagram)
        .map_err(|e| TouchFabricError::transport(format!("OSC decode failed: {e:?}")))?;

    let mut out = Vec::new();
    flatten(packet, &mut out);
    Ok(out)
}

fn flatten(packet: OscPacket, out: &mut Vec<(String, Vec<String>)>) {
    match packet {
        OscPacket::Message(msg) => {
            let strings = msg
                .args
                .into_iter()
                .filter_map(|arg| match arg {
                    OscType::String(s) => Some(s),
                    _ => None,
                })
                .collect();
            out.push((msg.addr, strings));
        }
        OscPacket::Bundle(bundle) => {
            for inner in bundle.content {
                flatten(inner, out);
            }
        }
    }
}

/// Decode every touch batch addressed to `address` in a datagram.
///
/// Each string argument is parsed as one batch, so a sender that appends
/// several payloads to a single message still decodes.
pub fn decode_touch_batches(
    datagram: &[u8],
    address: &str,
) -> TouchFabricResult<Vec<Vec<Touch>>> {
    let mut batches = Vec::new();
    for (addr, args) in decode_messages(datagram)? {
        if addr != address {
            tracing::debug!(%addr, "Ignoring message for another address");
            continue;
        }
        for payload in args {
            batches.push(decode_batch(&payload)?);
        }
    }
    Ok(batches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use touchfabric_model::geometry::Vec2;
    use touchfabric_model::touch::{encode_batch, TouchPosition};

    fn touch(id: i32) -> Touch {
        Touch {
            id,
            speed: 1.5,
            direction: Vec2::new(-0.5, 0.25),
            position: TouchPosition {
                x: 0.25,
                y: 0.5,
                z: 0.02,
            },
        }
    }

    #[test]
    fn test_message_layout() {
        let bytes = encode_message("/touches", "[]").unwrap();
        // "/touches" + NUL padded to 12, ",s" padded to 4, "[]" padded to 4
        assert_eq!(bytes.len(), 20);
        assert_eq!(&bytes[..8], b"/touches");
        assert_eq!(&bytes[12..14], b",s");
        assert_eq!(&bytes[16..18], b"[]");
        assert_eq!(bytes.len() % 4, 0);
    }

    #[test]
    fn test_decode_touch_batch() {
        let payload = encode_batch(&[touch(1), touch(2)]).unwrap();
        let bytes = encode_message("/touches", &payload).unwrap();

        let batches = decode_touch_batches(&bytes, "/touches").unwrap();
        assert_eq!(batches, vec![vec![touch(1), touch(2)]]);
    }

    #[test]
    fn test_heartbeat_decodes_to_empty_batch() {
        let bytes = encode_message("/touches", "[]").unwrap();
        assert_eq!(
            decode_touch_batches(&bytes, "/touches").unwrap(),
            vec![Vec::<Touch>::new()]
        );
    }

    #[test]
    fn test_other_addresses_are_ignored() {
        let bytes = encode_message("/status", "[]").unwrap();
        assert!(decode_touch_batches(&bytes, "/touches").unwrap().is_empty());
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(decode_messages(&[1, 2, 3]).is_err());
    }

    #[test]
    fn test_bad_json_payload_is_an_error() {
        let bytes = encode_message("/touches", "not json").unwrap();
        assert!(decode_touch_batches(&bytes, "/touches").is_err());
    }
}

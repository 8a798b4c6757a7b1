use path_replay::codec::{decode, encode, MAX_TOKEN_LEN};
use path_replay::{CodecError, ShareLink, TokenFault};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use scenario_tree::NodeId;

fn ids(raw: &[&str]) -> Vec<NodeId> {
    raw.iter().copied().map(NodeId::from).collect()
}

#[test]
fn test_known_token() {
    let token = encode(&ids(&["b", "b-1"]));
    assert_eq!(token.as_str(), "WyJiIiwiYi0xIl0");
    assert_eq!(decode("WyJiIiwiYi0xIl0").unwrap(), ids(&["b", "b-1"]));
}

#[test]
fn test_tampered_tokens_are_invalid() {
    let tampered = [
        "WyJiIiwiYi0xIl0!",
        "IiwiYi0xIl0",
        "WyJiIiwiYi0xIl",
        "WyJi=IiwiYi0xIl0",
        "WyJiIiwiYi0xIl0x",
        "",
        "not a token",
    ];

    for token in tampered {
        let result = decode(token);
        assert!(
            matches!(result, Err(CodecError::InvalidToken(_))),
            "{token:?} decoded to {result:?}"
        );
    }
}

#[test]
fn test_token_of_a_single_string_is_invalid() {
    // "b" on its own, not a list
    let err = decode("ImIi").unwrap_err();
    assert!(matches!(err.fault(), TokenFault::Payload(_)));
}

#[test]
fn test_oversized_token() {
    let err = decode(&"W".repeat(MAX_TOKEN_LEN + 4)).unwrap_err();
    assert!(err.to_string().contains("limit"));
}

#[test]
fn test_unicode_ids_survive() {
    let path = ids(&["ünïcode", "空", "with space", "quote\"d"]);
    assert_eq!(decode(encode(&path).as_str()).unwrap(), path);
}

#[test]
fn test_share_url_shape() {
    let link = ShareLink::for_path("https://precog.example", &ids(&["b", "b-1"]));
    insta::assert_snapshot!(link.url(), @"https://precog.example/share/WyJiIiwiYi0xIl0");

    let token = ShareLink::token_from_input(&link.url()).to_string();
    assert_eq!(decode(&token).unwrap(), ids(&["b", "b-1"]));
}

proptest! {
    #[test]
    fn test_encode_decode_round_trip(raw in prop::collection::vec(".*", 1..12)) {
        let path: Vec<NodeId> = raw.into_iter().map(NodeId::from).collect();
        let token = encode(&path);

        prop_assert!(token.as_str().bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_'));
        prop_assert_eq!(decode(token.as_str()).unwrap(), path);
    }

    #[test]
    fn test_truncated_token_never_decodes(raw in prop::collection::vec("[a-z0-9-]{1,12}", 1..8)) {
        let path: Vec<NodeId> = raw.into_iter().map(NodeId::from).collect();
        let token = encode(&path);
        let truncated = &token.as_str()[..token.as_str().len() - 1];

        prop_assert!(decode(truncated).is_err());
    }
}

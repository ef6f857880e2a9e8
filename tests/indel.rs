extern crate indelpred;

use indelpred::indel::*;

fn roundtrip(encoded: &str) {
    let token = parse(encoded).unwrap();

    assert_eq!(format(&token), encoded);
    assert_eq!(parse(&format(&token)).unwrap(), token);
}

#[test]
fn test_parse_null() {
    let token = parse("-").unwrap();

    assert!(token.is_null());
    assert_eq!(token.kind(), Kind::Null);
    assert_eq!(token.size(), 0);
    assert_eq!(classify(&token), Frame::InFrame);
    assert_eq!(token, IndelToken::null());
}

#[test]
fn test_parse_deletion() {
    let token = parse("D3_L-2C1").unwrap();

    assert_eq!(token.kind(), Kind::Deletion);
    assert_eq!(token.size(), 3);
    assert_eq!(token.details().left, -2);
    assert_eq!(token.details().microhomology, 1);
    assert_eq!(token.details().right, None);
    assert!(token.details().muts.is_empty());
    assert_eq!(token.net_size(), -3);
}

#[test]
fn test_parse_insertion_with_right_offset() {
    let token = parse("I1_L-1C1R0").unwrap();

    assert_eq!(token.kind(), Kind::Insertion);
    assert_eq!(token.size(), 1);
    assert_eq!(token.details().left, -1);
    assert_eq!(token.details().microhomology, 1);
    assert_eq!(token.details().right, Some(0));
}

#[test]
fn test_parse_mixed() {
    let token = parse("D4_L-3C0_I1_L1C0").unwrap();

    assert_eq!(token.kind(), Kind::Mixed);
    assert_eq!(token.size(), 3);
    assert_eq!(token.net_size(), -3);
    assert_eq!(token.details().left, -3);
    assert_eq!(token.details().muts.len(), 2);
    assert_eq!(token.details().muts[1].kind, Kind::Insertion);
    assert_eq!(token.details().muts[1].left, 1);
    assert_eq!(classify(&token), Frame::InFrame);
}

#[test]
fn test_roundtrip() {
    roundtrip("-");
    roundtrip("D1_L0C0");
    roundtrip("D3_L0C1");
    roundtrip("D12_L-10C4R2");
    roundtrip("I1_L0C2");
    roundtrip("I2_L-1C0R-1");
    roundtrip("D2_L-1C0_I1_L0C0");
    roundtrip("I1_L0C0_D5_L-4C2R1_I3_L2C0");
}

#[test]
fn test_from_str() {
    let token: IndelToken = "D3_L0C0".parse().unwrap();

    assert_eq!(token, parse("D3_L0C0").unwrap());
    assert!("D_L2C1".parse::<IndelToken>().is_err());
}

#[test]
fn test_reject_malformed() {
    for encoded in &[
        "",
        "_",
        "--",
        "D_L2C1",
        "X5_L0C0",
        "D0_L0C0",
        "D3",
        "D3_",
        "D3_L0",
        "D3_C0L0",
        "D3_L0C",
        "D3_L0C-1",
        "D3_L0C0R",
        "D3_L0C0X1",
        "D3_L0C0_",
        "D3_L0C0_I1",
        "d3_L0C0",
        "D+3_L0C0",
        "D03_L0C0",
        "D3_L-0C0",
        "D3_L0C0 ",
        "D99999999999_L0C0",
    ] {
        match parse(encoded) {
            Err(indelpred::errors::Error(indelpred::errors::ErrorKind::MalformedToken(v), _)) => {
                assert_eq!(&v, encoded)
            }
            other => panic!("{:?} parsed as {:?}", encoded, other),
        }
    }
}

#[test]
fn test_classify_frames() {
    assert_eq!(classify(&parse("D3_L0C0").unwrap()), Frame::InFrame);
    assert_eq!(classify(&parse("D4_L0C0").unwrap()), Frame::OutOfFrame);
    assert_eq!(classify(&parse("I6_L0C0").unwrap()), Frame::InFrame);
    assert_eq!(classify(&parse("I1_L0C2").unwrap()), Frame::OutOfFrame);
    assert_eq!(classify(&parse("D1_L0C0_I1_L0C0").unwrap()), Frame::InFrame);
    assert_eq!(classify(&parse("D2_L0C0_D2_L3C0").unwrap()), Frame::OutOfFrame);
}

#[test]
fn test_equal_by_value() {
    assert_eq!(parse("D3_L0C1").unwrap(), parse("D3_L0C1").unwrap());
    assert_ne!(parse("D3_L0C1").unwrap(), parse("D3_L0C1R0").unwrap());
    assert_ne!(parse("D3_L0C1").unwrap(), parse("I3_L0C1").unwrap());
}

#[test]
fn test_reject_oversized_mixed() {
    let encoded = "D4294967295_L0C0_D4294967295_L0C0";
    assert!(parse("D4294967295_L0C0").is_ok());

    match parse(encoded) {
        Err(indelpred::errors::Error(indelpred::errors::ErrorKind::MalformedToken(v), _)) => {
            assert_eq!(v, encoded)
        }
        other => panic!("{:?} parsed as {:?}", encoded, other),
    }
}

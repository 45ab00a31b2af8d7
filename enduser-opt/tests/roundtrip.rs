mod common;

use common::example_enduser;
use enduser_model::EndUser;
use enduser_opt::optimize;
use serde_json::Value;

#[test]
fn test_dict_round_trip_without_results() {
    let enduser = example_enduser();
    let exported = enduser.to_dict();

    let rebuilt = EndUser::from_dict(&exported).unwrap();
    let reimported = rebuilt.to_dict();

    assert_eq!(reimported, exported);
}

#[test]
fn test_dict_round_trip_with_results() {
    let mut enduser = example_enduser();
    enduser.include_results = true;
    optimize(&mut enduser).unwrap();
    let exported = enduser.to_dict();
    assert!(exported.contains_key("loss_i"));

    let rebuilt = EndUser::from_dict(&exported).unwrap();
    let reimported = rebuilt.to_dict();

    assert_eq!(reimported, exported);
    assert_eq!(rebuilt.loss, enduser.loss);
    assert_eq!(rebuilt.horizon, enduser.horizon);
}

#[test]
fn test_json_file_round_trip() {
    let mut enduser = example_enduser();
    optimize(&mut enduser).unwrap();
    let exported = enduser.to_dict();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("opt.json");
    std::fs::write(
        &path,
        serde_json::to_string_pretty(&Value::Object(exported.clone())).unwrap(),
    )
    .unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let parsed: Value = serde_json::from_str(&text).unwrap();
    let document = parsed.as_object().unwrap();

    let rebuilt = EndUser::from_dict(document).unwrap();
    assert_eq!(rebuilt.to_dict(), exported);
}

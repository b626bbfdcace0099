//! End-to-end relay tests over real WebSocket connections.
//!
//! Each test starts a relay on an ephemeral port, connects device-class and
//! client-class sockets through the actual upgrade path, and asserts the
//! bytes and JSON observed on the wire.

use roverlink_core::config::Config;
use roverlink_integration_tests::{next_binary, next_json, send_binary, send_json, TestRelay};
use roverlink_proto::Message;
use serde_json::json;

#[tokio::test]
async fn test_listing_follows_device_lifecycle() {
    let relay = TestRelay::start_default().await;

    let mut client = relay.connect_client().await;
    let listing = next_json(&mut client).await;
    assert_eq!(listing["type"], "device_list");
    assert!(listing["devices"].as_array().unwrap().is_empty());

    let device = relay.connect_device().await;
    let listing = next_json(&mut client).await;
    let devices = listing["devices"].as_array().unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0]["owned"], false);
    let name = devices[0]["name"].as_str().unwrap();
    let id = devices[0]["id"].as_str().unwrap();
    assert_eq!(name, format!("rover-{}", &id[..8]));

    drop(device);
    let listing = next_json(&mut client).await;
    assert!(listing["devices"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_exclusive_control_flow() {
    let relay = TestRelay::start_default().await;

    // Device connects and is listed.
    let mut device = relay.connect_device().await;

    // Client A connects and sees the device unowned.
    let mut a = relay.connect_client().await;
    let listing = next_json(&mut a).await;
    assert_eq!(listing["type"], "device_list");
    let device_id = listing["devices"][0]["id"].as_str().unwrap().to_string();
    assert_eq!(listing["devices"][0]["owned"], false);

    // A assumes: the device camera turns on, A gets a confirmation and the
    // updated listing.
    send_json(&mut a, &json!({"type": "assume_device", "deviceId": device_id})).await;
    assert_eq!(next_binary(&mut device).await, vec![3, 1, 0, 1]);
    let assumed = next_json(&mut a).await;
    assert_eq!(assumed["type"], "device_assumed");
    assert_eq!(assumed["deviceId"], device_id.as_str());
    let listing = next_json(&mut a).await;
    assert_eq!(listing["devices"][0]["owned"], true);

    // B arrives late, sees the device owned, and is refused.
    let mut b = relay.connect_client().await;
    let listing = next_json(&mut b).await;
    assert_eq!(listing["devices"][0]["owned"], true);
    send_json(&mut b, &json!({"type": "assume_device", "deviceId": device_id})).await;
    let refusal = next_json(&mut b).await;
    assert_eq!(refusal["type"], "error");
    assert!(refusal["message"]
        .as_str()
        .unwrap()
        .contains("already controlled"));

    // Owner key input becomes a motor command on the device side.
    send_json(&mut a, &json!({"type": "control", "action": "w"})).await;
    assert_eq!(next_binary(&mut device).await, vec![5, 2, 0, 1, 1]);

    // Telemetry flows back to the owner with the canonical encoding.
    let telemetry = Message::telemetry(1, 1, 88, 30).encode().to_vec();
    send_binary(&mut device, telemetry.clone()).await;
    assert_eq!(next_binary(&mut a).await, vec![2, 4, 0, 1, 1, 88, 30]);
    assert_eq!(telemetry, vec![2, 4, 0, 1, 1, 88, 30]);

    // A hangs up: the camera turns off and the listing frees up.
    drop(a);
    assert_eq!(next_binary(&mut device).await, vec![3, 1, 0, 0]);
    let listing = next_json(&mut b).await;
    assert_eq!(listing["devices"][0]["owned"], false);

    // The release cooldown still guards the device.
    send_json(&mut b, &json!({"type": "assume_device", "deviceId": device_id})).await;
    let refusal = next_json(&mut b).await;
    assert_eq!(refusal["type"], "error");
    assert!(refusal["message"].as_str().unwrap().contains("cooling down"));
}

#[tokio::test]
async fn test_leave_turns_camera_off() {
    let relay = TestRelay::start_default().await;
    let mut device = relay.connect_device().await;

    let mut client = relay.connect_client().await;
    let listing = next_json(&mut client).await;
    let device_id = listing["devices"][0]["id"].as_str().unwrap().to_string();

    send_json(
        &mut client,
        &json!({"type": "assume_device", "deviceId": device_id}),
    )
    .await;
    assert_eq!(next_binary(&mut device).await, vec![3, 1, 0, 1]);
    let assumed = next_json(&mut client).await;
    assert_eq!(assumed["type"], "device_assumed");
    let listing = next_json(&mut client).await;
    assert_eq!(listing["devices"][0]["owned"], true);

    send_json(&mut client, &json!({"type": "leave_device"})).await;
    assert_eq!(next_binary(&mut device).await, vec![3, 1, 0, 0]);
    let listing = next_json(&mut client).await;
    assert_eq!(listing["devices"][0]["owned"], false);
}

#[tokio::test]
async fn test_raw_drive_frames_respect_ownership() {
    let relay = TestRelay::start_default().await;
    let mut device = relay.connect_device().await;

    let mut owner = relay.connect_client().await;
    let listing = next_json(&mut owner).await;
    let device_id = listing["devices"][0]["id"].as_str().unwrap().to_string();
    send_json(
        &mut owner,
        &json!({"type": "assume_device", "deviceId": device_id}),
    )
    .await;
    assert_eq!(next_binary(&mut device).await, vec![3, 1, 0, 1]);

    let mut bystander = relay.connect_client().await;
    let _ = next_json(&mut bystander).await;

    // The bystander's drive frame is dropped; the owner's goes through. The
    // device seeing the owner's frame as its next message proves the drop.
    send_binary(&mut bystander, vec![5, 2, 0, 1, 1]).await;
    send_binary(&mut owner, vec![6, 1, 0, 5]).await;
    assert_eq!(next_binary(&mut device).await, vec![6, 1, 0, 5]);

    send_binary(&mut owner, vec![5, 2, 0, 2, 2]).await;
    assert_eq!(next_binary(&mut device).await, vec![5, 2, 0, 2, 2]);
}

#[tokio::test]
async fn test_malformed_input_keeps_connections_open() {
    let relay = TestRelay::start_default().await;
    let mut device = relay.connect_device().await;

    let mut client = relay.connect_client().await;
    let _ = next_json(&mut client).await;

    // Unparseable text gets a structured reply.
    send_json(&mut client, &json!({"type": "reboot"})).await;
    let reply = next_json(&mut client).await;
    assert_eq!(reply["type"], "error");
    assert_eq!(reply["message"], "unsupported message");

    // A truncated frame is dropped without killing the connection.
    send_binary(&mut client, vec![2, 4]).await;
    send_json(&mut client, &json!({"type": "list_devices"})).await;
    let listing = next_json(&mut client).await;
    assert_eq!(listing["type"], "device_list");
    assert_eq!(listing["devices"].as_array().unwrap().len(), 1);

    // Same on the device side.
    send_binary(&mut device, vec![9, 1, 0, 7]).await;
    send_json(&mut client, &json!({"type": "list_devices"})).await;
    let listing = next_json(&mut client).await;
    assert_eq!(listing["devices"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_cooldown_expires_after_window() {
    let mut config = Config::default();
    config.cooldown.window_ms = 50;
    let relay = TestRelay::start(config).await;

    let mut device = relay.connect_device().await;
    let mut client = relay.connect_client().await;
    let listing = next_json(&mut client).await;
    let device_id = listing["devices"][0]["id"].as_str().unwrap().to_string();

    send_json(
        &mut client,
        &json!({"type": "assume_device", "deviceId": device_id}),
    )
    .await;
    assert_eq!(next_binary(&mut device).await, vec![3, 1, 0, 1]);
    let _ = next_json(&mut client).await; // device_assumed
    let _ = next_json(&mut client).await; // listing

    send_json(&mut client, &json!({"type": "leave_device"})).await;
    assert_eq!(next_binary(&mut device).await, vec![3, 1, 0, 0]);
    let _ = next_json(&mut client).await; // listing

    // Immediately after release the device is cooling down.
    send_json(
        &mut client,
        &json!({"type": "assume_device", "deviceId": device_id}),
    )
    .await;
    let refusal = next_json(&mut client).await;
    assert_eq!(refusal["type"], "error");
    assert!(refusal["message"].as_str().unwrap().contains("cooling down"));

    // Once the window passes the same request succeeds.
    tokio::time::sleep(std::time::Duration::from_millis(120)).await;
    send_json(
        &mut client,
        &json!({"type": "assume_device", "deviceId": device_id}),
    )
    .await;
    assert_eq!(next_binary(&mut device).await, vec![3, 1, 0, 1]);
    let confirmed = next_json(&mut client).await;
    assert_eq!(confirmed["type"], "device_assumed");
}

#[tokio::test]
async fn test_health_reports_connection_counts() {
    let relay = TestRelay::start_default().await;

    let _device = relay.connect_device().await;
    let mut first = relay.connect_client().await;
    let listing = next_json(&mut first).await;
    assert_eq!(listing["devices"].as_array().unwrap().len(), 1);

    let _second = relay.connect_client().await;
    // The second client's connect broadcast reaching the first client proves
    // both registrations are visible before the probe.
    let _ = next_json(&mut first).await;

    let body: serde_json::Value = reqwest::get(relay.health_url())
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["devices"], 1);
    assert_eq!(body["clients"], 2);

    assert_eq!(relay.mediator.device_count(), 1);
    assert_eq!(relay.mediator.client_count(), 2);
}

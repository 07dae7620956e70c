use tokio::sync::mpsc;
use wifi_plaza_ircd::client::{ClientId, WriterMsg};
use wifi_plaza_ircd::hub::{self, HubConfig, HubEvent};

fn test_config() -> HubConfig {
    HubConfig {
        server_name: "test.server".to_string(),
        password: None,
        motd_file: None,
        channel_log_dir: None,
        state_dir: None,
        respect_web: true,
    }
}

struct TestClient {
    id: ClientId,
    write_rx: mpsc::UnboundedReceiver<WriterMsg>,
}

async fn connect(hub_tx: &mpsc::UnboundedSender<HubEvent>, id: u64) -> TestClient {
    let (write_tx, write_rx) = mpsc::unbounded_channel();
    let client_id = ClientId(id);
    hub_tx
        .send(HubEvent::Connected { id: client_id, host: "127.0.0.1".to_string(), port: 0, write_tx })
        .unwrap();
    TestClient { id: client_id, write_rx }
}

async fn line(hub_tx: &mpsc::UnboundedSender<HubEvent>, client: &TestClient, text: &str) {
    hub_tx.send(HubEvent::Line { id: client.id, line: text.to_string() }).unwrap();
}

async fn recv_lines(client: &mut TestClient, count: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for _ in 0..count {
        match tokio::time::timeout(std::time::Duration::from_secs(1), client.write_rx.recv()).await {
            Ok(Some(WriterMsg::Line(text))) => lines.push(text),
            Ok(Some(WriterMsg::Close)) | Ok(None) | Err(_) => break,
        }
    }
    lines
}

async fn register(hub_tx: &mpsc::UnboundedSender<HubEvent>, client: &mut TestClient, nick: &str) {
    line(hub_tx, client, &format!("NICK {nick}")).await;
    line(hub_tx, client, &format!("USER {nick} 0 * :{nick} Realname")).await;
    // Welcome burst: 001-004, LUSERS (251), MOTD (422 since none configured).
    let burst = recv_lines(client, 6).await;
    assert!(burst.iter().any(|l| l.contains(" 001 ")), "missing welcome: {burst:?}");
}

#[tokio::test]
async fn registers_and_receives_welcome_burst() {
    let (hub_tx, hub_rx) = mpsc::unbounded_channel();
    tokio::spawn(hub::run(test_config(), hub_rx));

    let mut alice = connect(&hub_tx, 1).await;
    register(&hub_tx, &mut alice, "alice").await;
}

#[tokio::test]
async fn join_then_privmsg_reaches_other_member() {
    let (hub_tx, hub_rx) = mpsc::unbounded_channel();
    tokio::spawn(hub::run(test_config(), hub_rx));

    let mut alice = connect(&hub_tx, 1).await;
    let mut bob = connect(&hub_tx, 2).await;
    register(&hub_tx, &mut alice, "alice").await;
    register(&hub_tx, &mut bob, "bob").await;

    line(&hub_tx, &alice, "JOIN #lobby").await;
    let alice_join_burst = recv_lines(&mut alice, 3).await;
    assert!(alice_join_burst.iter().any(|l| l.contains(" 353 ")), "{alice_join_burst:?}");

    line(&hub_tx, &bob, "JOIN #lobby").await;
    let _bob_join_burst = recv_lines(&mut bob, 3).await;
    // alice should see bob's JOIN fan-out.
    let alice_sees_join = recv_lines(&mut alice, 1).await;
    assert!(alice_sees_join[0].contains("JOIN"), "{alice_sees_join:?}");

    line(&hub_tx, &bob, "PRIVMSG #lobby :hello alice").await;
    let alice_sees_msg = recv_lines(&mut alice, 1).await;
    assert!(alice_sees_msg[0].contains("PRIVMSG #lobby :hello alice"), "{alice_sees_msg:?}");
}

#[tokio::test]
async fn join_wrong_key_is_rejected() {
    let (hub_tx, hub_rx) = mpsc::unbounded_channel();
    tokio::spawn(hub::run(test_config(), hub_rx));

    let mut alice = connect(&hub_tx, 1).await;
    register(&hub_tx, &mut alice, "alice").await;
    line(&hub_tx, &alice, "JOIN #locked").await;
    let _ = recv_lines(&mut alice, 3).await;
    line(&hub_tx, &alice, "MODE #locked +k secret").await;
    let _ = recv_lines(&mut alice, 1).await;

    let mut bob = connect(&hub_tx, 2).await;
    register(&hub_tx, &mut bob, "bob").await;
    line(&hub_tx, &bob, "JOIN #locked wrongkey").await;
    let reply = recv_lines(&mut bob, 1).await;
    assert!(reply[0].contains(" 475 "), "{reply:?}");
}

#[tokio::test]
async fn quit_notifies_channel_peers() {
    let (hub_tx, hub_rx) = mpsc::unbounded_channel();
    tokio::spawn(hub::run(test_config(), hub_rx));

    let mut alice = connect(&hub_tx, 1).await;
    let mut bob = connect(&hub_tx, 2).await;
    register(&hub_tx, &mut alice, "alice").await;
    register(&hub_tx, &mut bob, "bob").await;

    line(&hub_tx, &alice, "JOIN #lobby").await;
    let _ = recv_lines(&mut alice, 3).await;
    line(&hub_tx, &bob, "JOIN #lobby").await;
    let _ = recv_lines(&mut bob, 3).await;
    let _ = recv_lines(&mut alice, 1).await;

    line(&hub_tx, &bob, "QUIT :goodbye").await;
    let alice_sees_quit = recv_lines(&mut alice, 1).await;
    assert!(alice_sees_quit[0].contains("QUIT :goodbye"), "{alice_sees_quit:?}");

    let bob_closing = recv_lines(&mut bob, 1).await;
    assert!(matches!(bob_closing.first(), Some(line) if line.starts_with("ERROR")));
}

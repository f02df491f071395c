//! Integration tests for the TCP transport.
//!
//! These spin up a real listener on an ephemeral port and a raw
//! `TcpStream` client, and check that frames survive the trip in both
//! directions.

use std::time::Duration;

use gobang_protocol::{
    EnrollRequest, EnrollResponse, Envelope, MessageType, Payload,
};
use gobang_transport::{TcpTransport, Transport, TransportError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

async fn bind() -> (TcpTransport, String) {
    let transport = TcpTransport::bind("127.0.0.1:0".parse().unwrap())
        .await
        .expect("should bind");
    let addr = transport.local_addr().unwrap().to_string();
    (transport, addr)
}

#[tokio::test]
async fn test_tcp_accept_and_exchange_frames() {
    let (mut transport, addr) = bind().await;

    let server = tokio::spawn(async move { transport.accept().await.expect("should accept") });
    let mut client = TcpStream::connect(&addr).await.expect("client should connect");
    let conn = server.await.expect("task should complete");

    assert!(conn.id().into_inner() > 0);
    let (mut reader, mut writer) = conn.into_split();

    // --- Client sends, server receives ---
    let request = EnrollRequest { name: "alice".into() }.to_envelope().unwrap();
    client.write_all(&request.to_bytes()).await.unwrap();

    let received = tokio::time::timeout(Duration::from_secs(5), reader.recv())
        .await
        .expect("timeout")
        .expect("recv should succeed");
    assert_eq!(received.message_type(), Some(MessageType::Enroll));
    assert_eq!(EnrollRequest::decode(received.payload()).unwrap().name, "alice");

    // --- Server sends, client receives ---
    let response = EnrollResponse { name: "alice".into(), success: true }
        .to_envelope()
        .unwrap();
    writer.send(&response).await.unwrap();

    let mut buf = vec![0u8; response.encoded_len()];
    client.read_exact(&mut buf).await.unwrap();
    assert_eq!(buf, response.to_bytes());
}

#[tokio::test]
async fn test_tcp_client_close_ends_reader() {
    let (mut transport, addr) = bind().await;

    let server = tokio::spawn(async move { transport.accept().await.expect("should accept") });
    let client = TcpStream::connect(&addr).await.unwrap();
    let conn = server.await.unwrap();
    let (mut reader, _writer) = conn.into_split();

    drop(client);

    let result = tokio::time::timeout(Duration::from_secs(5), reader.recv())
        .await
        .expect("timeout");
    assert!(matches!(result, Err(TransportError::ConnectionClosed(_))));
}

#[tokio::test]
async fn test_tcp_unknown_tag_is_still_framed() {
    let (mut transport, addr) = bind().await;

    let server = tokio::spawn(async move { transport.accept().await.expect("should accept") });
    let mut client = TcpStream::connect(&addr).await.unwrap();
    let conn = server.await.unwrap();
    let (mut reader, _writer) = conn.into_split();

    let unknown = Envelope::from_raw(99, vec![1, 2, 3]).unwrap();
    client.write_all(&unknown.to_bytes()).await.unwrap();

    let received = reader.recv().await.unwrap();
    assert_eq!(received.tag(), 99);
    assert_eq!(received.message_type(), None);
    assert_eq!(received.payload(), &[1, 2, 3]);
}

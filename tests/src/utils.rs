use std::io;
use std::net::Ipv4Addr;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::io::AsyncWriteExt;
use anyhow::{Context, bail};
use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tokio::sync::mpsc;

const QUERY: &[u8] = b"TA:getattrlong";

/// What the mock does once it has read a query.
#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    /// Write the bytes and close.
    Reply(&'static [u8]),
    /// Close without writing anything.
    Hang,
    /// Never answer; wait for the client to go away.
    Hold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerEvent {
    Probed,
    Queried,
    Closed,
}

/// Fake test accessory listening on a loopback address.
pub struct MockAccessory {
    pub port: u16,
    events: mpsc::UnboundedReceiver<PeerEvent>,
}

impl MockAccessory {
    pub async fn start(behavior: Behavior) -> Self {
        Self::start_on(Ipv4Addr::LOCALHOST, 0, behavior)
            .await
            .expect("failed to bind mock accessory")
    }

    pub async fn start_on(addr: Ipv4Addr, port: u16, behavior: Behavior) -> io::Result<Self> {
        let listener = TcpListener::bind((addr, port)).await?;
        let port = listener.local_addr()?.port();
        let (tx, events) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                tokio::spawn(serve(socket, behavior, tx.clone()));
            }
        });

        Ok(Self { port, events })
    }

    /// Waits until `wanted` is reported, skipping other events.
    pub async fn wait_for(&mut self, wanted: PeerEvent, within: Duration) -> bool {
        let search = async {
            while let Some(event) = self.events.recv().await {
                if event == wanted {
                    return true;
                }
            }
            false
        };
        tokio::time::timeout(within, search).await.unwrap_or(false)
    }
}

async fn serve(mut socket: TcpStream, behavior: Behavior, tx: mpsc::UnboundedSender<PeerEvent>) {
    let mut request = vec![0u8; QUERY.len()];
    if socket.read_exact(&mut request).await.is_err() || request != QUERY {
        let _ = tx.send(PeerEvent::Probed);
        return;
    }
    let _ = tx.send(PeerEvent::Queried);

    match behavior {
        Behavior::Reply(reply) => {
            let _ = socket.write_all(reply).await;
        }
        Behavior::Hang => {}
        Behavior::Hold => {
            let mut sink = [0u8; 64];
            while let Ok(n) = socket.read(&mut sink).await {
                if n == 0 {
                    break;
                }
            }
            let _ = tx.send(PeerEvent::Closed);
        }
    }
}

/// A loopback port with nothing listening on it.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("failed to bind");
    listener.local_addr().expect("no local address").port()
}

/// Listener on every local address whose accept queue is full and never
/// drained, so further connection attempts stall until the client gives up.
pub struct StalledListener {
    pub port: u16,
    _listener: TcpListener,
    _queued: Vec<TcpStream>,
}

impl StalledListener {
    pub async fn start() -> anyhow::Result<Self> {
        let socket = TcpSocket::new_v4().context("failed to create socket")?;
        socket
            .bind((Ipv4Addr::UNSPECIFIED, 0).into())
            .context("failed to bind stalled listener")?;
        let listener = socket.listen(0).context("failed to listen")?;
        let port = listener.local_addr()?.port();

        let mut queued = Vec::new();
        for _ in 0..8 {
            let attempt = TcpStream::connect((Ipv4Addr::LOCALHOST, port));
            match tokio::time::timeout(Duration::from_millis(200), attempt).await {
                Ok(Ok(stream)) => queued.push(stream),
                Ok(Err(e)) => return Err(e).context("failed to fill accept queue"),
                Err(_elapsed) => {
                    return Ok(Self {
                        port,
                        _listener: listener,
                        _queued: queued,
                    });
                }
            }
        }
        bail!("accept queue of port {port} never filled up")
    }
}

//! Connection Actor - WebSocket client to the development server
//!
//! Runs on a plain thread. The socket is switched to non-blocking after
//! the handshake so one loop can interleave:
//!
//! - draining acknowledgements from the patch actor (outbound)
//! - polling the socket for notifications (inbound)
//!
//! The thread returns once after the reload signal is written, when the
//! server goes away, or on shutdown. Acknowledgements stamped with another
//! connection's generation are dropped unwritten.

use std::io::ErrorKind;
use std::net::TcpStream;
use std::time::Duration;

use anyhow::{Context, Result};
use crossbeam::channel::{Receiver, TryRecvError};
use tokio::sync::mpsc;
use tungstenite::WebSocket;
use tungstenite::stream::MaybeTlsStream;

use super::messages::{AckFrame, ConnectionExit, PatchMsg};
use crate::config::ServerConfig;
use crate::core::is_shutdown;
use crate::reload::message::{Ack, Notification};

/// Flush attempts after the reload signal before the socket is dropped.
const CLOSE_FLUSH_ATTEMPTS: usize = 50;

type Socket = WebSocket<MaybeTlsStream<TcpStream>>;

pub struct ConnectionActor {
    ws: Socket,
    generation: u64,
    probe: String,
    poll_interval: Duration,
    patch_tx: mpsc::Sender<PatchMsg>,
    ack_rx: Receiver<AckFrame>,
}

impl ConnectionActor {
    /// Open the socket. Blocks for the handshake.
    pub fn connect(
        server: &ServerConfig,
        generation: u64,
        patch_tx: mpsc::Sender<PatchMsg>,
        ack_rx: Receiver<AckFrame>,
    ) -> Result<Self> {
        let url = server.socket_url()?;
        let (ws, _response) =
            tungstenite::connect(url.as_str()).with_context(|| format!("failed to connect to {}", url))?;

        if let MaybeTlsStream::Plain(stream) = ws.get_ref() {
            stream.set_nonblocking(true)?;
        }

        crate::debug!("connect"; "connected to {} (generation {})", url, generation);
        Ok(Self {
            ws,
            generation,
            probe: server.probe.clone(),
            poll_interval: server.poll_interval(),
            patch_tx,
            ack_rx,
        })
    }

    /// Run the poll loop until the connection ends.
    pub fn run(mut self) -> ConnectionExit {
        loop {
            if is_shutdown() {
                self.close();
                return ConnectionExit::Shutdown;
            }

            if let Some(exit) = self.write_acks() {
                return exit;
            }

            match self.ws.read() {
                Ok(msg) => {
                    if let Some(exit) = self.dispatch(msg) {
                        return exit;
                    }
                }
                Err(tungstenite::Error::Io(ref e)) if e.kind() == ErrorKind::WouldBlock => {
                    self.flush();
                    std::thread::sleep(self.poll_interval);
                }
                Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                    crate::debug!("connect"; "closed by server");
                    return ConnectionExit::Closed;
                }
                Err(e) => {
                    crate::log!("connect"; "read failed: {}", e);
                    return ConnectionExit::Closed;
                }
            }
        }
    }

    /// Forward an inbound frame to the patch actor.
    fn dispatch(&mut self, msg: tungstenite::Message) -> Option<ConnectionExit> {
        let forward = match Notification::classify(msg, &self.probe)? {
            Notification::Probe => return None,
            Notification::PathChanged(path) => PatchMsg::PathChanged {
                path,
                generation: self.generation,
            },
            Notification::StylesheetChanged => PatchMsg::StylesheetChanged,
            Notification::Malformed(what) => {
                crate::log!("connect"; "ignoring malformed notification: {}", what);
                return None;
            }
            Notification::Closed => {
                // tungstenite queues the close reply; the next read ends the loop
                crate::debug!("connect"; "close frame received");
                return None;
            }
        };

        if self.patch_tx.blocking_send(forward).is_err() {
            self.close();
            return Some(ConnectionExit::Shutdown);
        }
        None
    }

    /// Write every queued acknowledgement. The reload signal ends the
    /// connection.
    fn write_acks(&mut self) -> Option<ConnectionExit> {
        loop {
            let ack = match self.ack_rx.try_recv() {
                Ok(frame) if frame.generation == self.generation => frame.ack,
                Ok(frame) => {
                    crate::debug!("connect"; "dropped ack for generation {}: {:?}", frame.generation, frame.ack);
                    continue;
                }
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => {
                    self.close();
                    return Some(ConnectionExit::Shutdown);
                }
            };

            let reload = ack == Ack::Reload;
            for frame in ack.into_messages() {
                match self.ws.send(frame) {
                    Ok(()) => {}
                    Err(tungstenite::Error::Io(ref e)) if e.kind() == ErrorKind::WouldBlock => {}
                    Err(e) => {
                        crate::log!("connect"; "write failed: {}", e);
                        return Some(ConnectionExit::Closed);
                    }
                }
            }

            if reload {
                crate::debug!("connect"; "reload signal sent, closing");
                self.close();
                return Some(ConnectionExit::Reload);
            }
        }
    }

    /// Push buffered frames out. Returns true once nothing is pending.
    fn flush(&mut self) -> bool {
        match self.ws.flush() {
            Ok(()) => true,
            Err(tungstenite::Error::Io(ref e)) if e.kind() == ErrorKind::WouldBlock => false,
            Err(_) => true,
        }
    }

    /// Start the close handshake and drain the write buffer.
    fn close(&mut self) {
        let _ = self.ws.close(None);
        for _ in 0..CLOSE_FLUSH_ATTEMPTS {
            if self.flush() {
                return;
            }
            std::thread::sleep(self.poll_interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::thread;

    use tungstenite::Message;

    use super::*;
    use crate::reload::message::decode_indexes;

    fn server_config(port: u16) -> ServerConfig {
        ServerConfig {
            url: format!("http://127.0.0.1:{}", port),
            ..ServerConfig::default()
        }
    }

    fn frame(generation: u64, ack: Ack) -> AckFrame {
        AckFrame { generation, ack }
    }

    fn read_blocking(ws: &mut WebSocket<TcpStream>) -> Message {
        loop {
            match ws.read() {
                Ok(Message::Ping(_) | Message::Pong(_)) => continue,
                Ok(msg) => return msg,
                Err(e) => panic!("server read failed: {e}"),
            }
        }
    }

    #[test]
    fn test_forwards_notifications_and_writes_acks() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut ws = tungstenite::accept(stream).unwrap();
            ws.send(Message::Text("you up?".into())).unwrap();
            ws.send(Message::Text("/card".into())).unwrap();
            ws.send(Message::Binary(vec![7u8].into())).unwrap();

            let signal = read_blocking(&mut ws);
            let indexes = read_blocking(&mut ws);
            ws.close(None).unwrap();
            // drain until the close handshake completes
            while ws.read().is_ok() {}
            (signal, indexes)
        });

        let (patch_tx, mut patch_rx) = mpsc::channel(8);
        let (ack_tx, ack_rx) = crossbeam::channel::unbounded();
        let actor = ConnectionActor::connect(&server_config(port), 4, patch_tx, ack_rx).unwrap();
        let client = thread::spawn(move || actor.run());

        assert_eq!(
            patch_rx.blocking_recv(),
            Some(PatchMsg::PathChanged {
                path: "/card".to_string(),
                generation: 4
            })
        );
        assert_eq!(patch_rx.blocking_recv(), Some(PatchMsg::StylesheetChanged));

        // a late reply for the previous connection is not written
        ack_tx.send(frame(3, Ack::PatchStarting { indexes: vec![9] })).unwrap();
        ack_tx.send(frame(4, Ack::PatchStarting { indexes: vec![0, 1] })).unwrap();

        let (signal, indexes) = server.join().unwrap();
        assert_eq!(signal, Message::Text("c".into()));
        match indexes {
            Message::Binary(bytes) => assert_eq!(decode_indexes(&bytes), vec![0, 1]),
            other => panic!("Expected binary frame, got {other:?}"),
        }
        assert_eq!(client.join().unwrap(), ConnectionExit::Closed);
    }

    #[test]
    fn test_reload_ack_ends_connection() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut ws = tungstenite::accept(stream).unwrap();
            read_blocking(&mut ws)
        });

        let (patch_tx, _patch_rx) = mpsc::channel(8);
        let (ack_tx, ack_rx) = crossbeam::channel::unbounded();
        let actor = ConnectionActor::connect(&server_config(port), 1, patch_tx, ack_rx).unwrap();
        ack_tx.send(frame(1, Ack::Reload)).unwrap();

        assert_eq!(actor.run(), ConnectionExit::Reload);
        assert_eq!(server.join().unwrap(), Message::Text("r".into()));
    }

    #[test]
    fn test_acks_for_other_generations_are_dropped() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut ws = tungstenite::accept(stream).unwrap();
            read_blocking(&mut ws)
        });

        let (patch_tx, _patch_rx) = mpsc::channel(8);
        let (ack_tx, ack_rx) = crossbeam::channel::unbounded();
        ack_tx.send(frame(1, Ack::PatchStarting { indexes: vec![0] })).unwrap();
        ack_tx.send(frame(1, Ack::Reload)).unwrap();
        ack_tx.send(frame(2, Ack::Reload)).unwrap();

        let actor = ConnectionActor::connect(&server_config(port), 2, patch_tx, ack_rx).unwrap();
        assert_eq!(actor.run(), ConnectionExit::Reload);
        // first frame the server sees is the reload for generation 2
        assert_eq!(server.join().unwrap(), Message::Text("r".into()));
    }

    #[test]
    fn test_connect_refused() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let (patch_tx, _patch_rx) = mpsc::channel(8);
        let (_ack_tx, ack_rx) = crossbeam::channel::unbounded::<AckFrame>();
        assert!(ConnectionActor::connect(&server_config(port), 1, patch_tx, ack_rx).is_err());
    }
}

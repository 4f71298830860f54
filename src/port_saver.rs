use rocket::fairing::{Fairing, Info, Kind};
use rocket::{Orbit, Rocket};
use tokio::sync::watch;

/// Pairs a liftoff fairing with a handle that learns the bound port, so
/// callers can bind to port 0 and still find the server.
pub fn create_pair() -> (PortSaver, Port) {
    let (tx, rx) = watch::channel(None);
    (PortSaver { sender: tx }, Port { receiver: rx })
}

#[derive(Clone)]
pub struct Port {
    receiver: watch::Receiver<Option<u16>>,
}

impl Port {
    /// Waits until the server has lifted off. Returns `None` if it never will.
    pub async fn get(&self) -> Option<u16> {
        let mut receiver = self.receiver.clone();
        loop {
            if let Some(port) = *receiver.borrow_and_update() {
                return Some(port);
            }
            if receiver.changed().await.is_err() {
                return *receiver.borrow();
            }
        }
    }
}

pub struct PortSaver {
    sender: watch::Sender<Option<u16>>,
}

#[rocket::async_trait]
impl Fairing for PortSaver {
    fn info(&self) -> Info {
        Info {
            name: "Port Saver",
            kind: Kind::Liftoff,
        }
    }

    async fn on_liftoff(&self, rocket: &Rocket<Orbit>) {
        let port = rocket.config().port;
        tracing::info!(port, "Server lifted off");
        // Nobody listening is fine; the port is only needed by tests.
        let _ = self.sender.send(Some(port));
    }
}

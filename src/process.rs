//! Running the external detector and streaming what it prints.

use std::path::PathBuf;
use std::process::Stdio;

use futures::stream::{self, BoxStream, StreamExt};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{debug, error, info, warn};

use crate::detection::{Invocation, OutputStream};
use crate::error::LauncherError;

const READ_CHUNK: usize = 4096;

/// Lifecycle of one detector process, in the order it is observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    Started { pid: Option<u32> },
    /// Raw bytes from one of the pipes, as they arrived.
    Output { stream: OutputStream, bytes: Vec<u8> },
    /// Both pipes are closed and the process has exited.
    Finished { code: Option<i32> },
    FailedToStart(String),
}

pub type ProcessEvents = BoxStream<'static, ProcessEvent>;

/// Something that can launch a program and report on it.
pub trait ProcessBridge {
    /// Launch `invocation`. Spawn errors are reported through the stream as
    /// [`ProcessEvent::FailedToStart`].
    fn start(&mut self, invocation: &Invocation) -> ProcessEvents;
}

/// Spawns real child processes with tokio.
///
/// The child is only spawned once the returned stream is polled, so it runs on
/// whichever executor drives the stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct SubprocessBridge;

impl ProcessBridge for SubprocessBridge {
    fn start(&mut self, invocation: &Invocation) -> ProcessEvents {
        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let (tx, rx) = mpsc::unbounded_channel();
        let driver = stream::once(run_child(command, invocation.program.clone(), tx))
            .filter_map(|()| futures::future::ready(None::<ProcessEvent>));

        stream::select(driver, UnboundedReceiverStream::new(rx)).boxed()
    }
}

async fn run_child(mut command: Command, program: PathBuf, events: UnboundedSender<ProcessEvent>) {
    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(source) => {
            let err = LauncherError::Spawn { program, source };
            error!("{err}");
            let _ = events.send(ProcessEvent::FailedToStart(err.to_string()));
            return;
        }
    };

    let pid = child.id();
    info!(?pid, program = %program.display(), "detector started");
    let _ = events.send(ProcessEvent::Started { pid });

    let stdout = forward(OutputStream::Stdout, child.stdout.take(), events.clone());
    let stderr = forward(OutputStream::Stderr, child.stderr.take(), events.clone());
    let (_, _, status) = tokio::join!(stdout, stderr, child.wait());

    let code = match status {
        Ok(status) => status.code(),
        Err(e) => {
            warn!("failed to wait for detector: {e}");
            None
        }
    };
    info!(?pid, ?code, "detector finished");
    let _ = events.send(ProcessEvent::Finished { code });
}

/// Pump one pipe into the event channel until EOF.
async fn forward<R>(
    stream: OutputStream,
    reader: Option<R>,
    events: UnboundedSender<ProcessEvent>,
) where
    R: AsyncRead + Unpin,
{
    let Some(mut reader) = reader else {
        return;
    };
    let mut buf = vec![0u8; READ_CHUNK];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                debug!(?stream, bytes = n, "detector output");
                let chunk = ProcessEvent::Output {
                    stream,
                    bytes: buf[..n].to_vec(),
                };
                if events.send(chunk).is_err() {
                    // Nobody is listening any more.
                    break;
                }
            }
            Err(e) => {
                warn!("failed to read detector output: {e}");
                break;
            }
        }
    }
}

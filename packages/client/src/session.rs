//! Client session: send typed lines, print lines from the server.

use relay_server::infrastructure::codec::{LineReader, write_line};
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::{
    io::{AsyncRead, AsyncWrite, AsyncWriteExt},
    net::TcpStream,
    sync::mpsc,
};

use crate::{config::ClientConfig, error::ClientError};

/// Typing this ends the session
pub const EXIT_COMMAND: &str = "exit";

/// How a chat session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user typed [`EXIT_COMMAND`]
    UserExit,
    /// Terminal input reached end of input
    InputClosed,
    /// The server closed the connection
    ServerClosed,
}

/// Prompt for a name, connect, and chat until exit or disconnect.
pub async fn run_client(config: ClientConfig) -> Result<SessionEnd, ClientError> {
    let mut editor = DefaultEditor::new()?;

    println!("What's your name?");
    let name = match editor.readline("") {
        Ok(name) => name,
        Err(ReadlineError::Eof | ReadlineError::Interrupted) => {
            return Err(ClientError::NameMissing);
        }
        Err(e) => return Err(e.into()),
    };

    let stream = TcpStream::connect(config.server)
        .await
        .map_err(|source| ClientError::Connect {
            addr: config.server,
            source,
        })?;
    println!("Connection was successful");
    tracing::debug!("connected to {}", config.server);

    let (read_half, mut write_half) = stream.into_split();
    write_line(&mut write_half, name.trim()).await?;
    println!("Type something and it will be sent (type '{EXIT_COMMAND}' to quit)...\n");

    let mut input = spawn_input_thread(editor);
    let mut reader = LineReader::new(read_half);
    let end = chat_loop(&mut reader, &mut write_half, &mut input, |line| {
        println!("{line}");
    })
    .await?;

    if end == SessionEnd::ServerClosed {
        println!("Connection closed by server.");
    }
    if let Err(e) = write_half.shutdown().await {
        tracing::debug!("failed to shut down connection cleanly: {}", e);
    }

    Ok(end)
}

/// Relay typed lines to the server and hand server lines to `render`,
/// concurrently, until one side ends.
pub async fn chat_loop<R, W, F>(
    reader: &mut LineReader<R>,
    writer: &mut W,
    input: &mut mpsc::UnboundedReceiver<String>,
    mut render: F,
) -> Result<SessionEnd, ClientError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    F: FnMut(&str),
{
    loop {
        tokio::select! {
            incoming = reader.next_line() => match incoming? {
                Some(line) => render(&line),
                None => return Ok(SessionEnd::ServerClosed),
            },
            typed = input.recv() => {
                let Some(typed) = typed else {
                    return Ok(SessionEnd::InputClosed);
                };
                let line = typed.trim_end_matches(['\r', '\n']);
                if line == EXIT_COMMAND {
                    return Ok(SessionEnd::UserExit);
                }
                if line.is_empty() {
                    continue;
                }
                write_line(writer, line).await?;
            }
        }
    }
}

// A plain thread rather than `spawn_blocking`: the runtime would otherwise
// wait on a pending `readline` at shutdown.
fn spawn_input_thread(mut editor: DefaultEditor) -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        loop {
            match editor.readline("") {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Eof | ReadlineError::Interrupted) => break,
                Err(e) => {
                    tracing::warn!("failed to read input: {}", e);
                    break;
                }
            }
        }
    });
    rx
}

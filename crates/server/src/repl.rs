//! Interactive chat loop
//!
//! Generic over the reader and writer so the loop can be driven from tests;
//! the binary wires it to stdin/stdout.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use leadlog_agent::{ChatSession, TurnOutcome};

use crate::ServerError;

/// Run the prompt/reply loop until an exit command or end of input.
///
/// A store failure ends the loop with an error; nothing further is accepted
/// once the log cannot be written.
pub async fn run_repl<R, W>(
    session: &mut ChatSession,
    input: R,
    mut output: W,
) -> Result<(), ServerError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    output
        .write_all(
            format!(
                "\nleadlog chat (model: {})\nType your message. Type /exit to quit.\n\n",
                session.backend().model_name()
            )
            .as_bytes(),
        )
        .await?;

    loop {
        output.write_all(b"You: ").await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            output.write_all(b"\nBye.\n").await?;
            break;
        };

        match session.handle_line(&line).await? {
            TurnOutcome::Skipped => continue,
            TurnOutcome::Exit => {
                output.write_all(b"Bye.\n").await?;
                break;
            },
            TurnOutcome::Reply { reply, .. } => {
                output.write_all(format!("\nAgent: {}\n\n", reply).as_bytes()).await?;
            },
        }
    }

    output.flush().await?;
    Ok(())
}

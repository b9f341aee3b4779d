//! Command execution: drives one exchange and reports its outcome.

use crate::repl::Dispatch;
use ferry_client::{ClientError, GetOutcome, PutOutcome, ReplyStatus, Session};
use tokio::io::{AsyncRead, AsyncWrite};

/// Executes one dispatched command against the session.
///
/// All outcomes are surfaced as log lines; only errors reach the
/// caller, which decides whether the session survives them.
pub async fn execute<S>(session: &mut Session<S>, dispatch: Dispatch) -> Result<(), ClientError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    match dispatch {
        Dispatch::Ls => {
            let listing = session.ls().await?;
            print!("{}", listing);
            Ok(())
        }

        Dispatch::Get(filename) => {
            match session.get(&filename).await? {
                GetOutcome::Empty => {
                    tracing::info!("{}: created empty local file", filename)
                }
                GetOutcome::Written(nbytes) => {
                    tracing::info!("{}: received {} bytes", filename, nbytes)
                }
                GetOutcome::Refused(_) => tracing::warn!("invalid filename"),
            }
            Ok(())
        }

        Dispatch::Put(filename) => {
            match session.put(&filename).await? {
                PutOutcome::Missing => tracing::warn!("{}: file does not exist", filename),
                PutOutcome::ZeroByte => {
                    tracing::warn!("{}: zero-byte file, nothing sent", filename)
                }
                PutOutcome::Sent { nbytes, status } => match status {
                    ReplyStatus::Acked => {
                        tracing::info!("{}: put of {} bytes acknowledged", filename, nbytes)
                    }
                    ReplyStatus::Nacked => {
                        tracing::warn!("{}: put refused by server", filename)
                    }
                    ReplyStatus::Ignored(_) => {}
                },
            }
            Ok(())
        }

        Dispatch::Rm(filename) => {
            match session.rm(&filename).await? {
                ReplyStatus::Acked => tracing::info!("{}: removed", filename),
                ReplyStatus::Nacked => {
                    tracing::warn!("{}: remove refused by server", filename)
                }
                ReplyStatus::Ignored(_) => {}
            }
            Ok(())
        }

        // Handled by the REPL loop before reaching here.
        Dispatch::Exit | Dispatch::Help | Dispatch::Invalid | Dispatch::MissingOperand(_) => {
            unreachable!()
        }
    }
}

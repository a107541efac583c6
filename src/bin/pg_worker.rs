//! Runs embedded `PostgreSQL` lifecycle steps for the integration tests.
//!
//! Usage:
//!
//! ```text
//! pg_worker <setup|start|stop> <payload-path>
//! ```
//!
//! The payload is a JSON `WorkerPayload` carrying cluster settings and
//! environment overrides. When launched as root the worker switches to the
//! `nobody` account before touching the cluster, because `initdb` refuses to
//! run as root.

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[cfg(unix)]
fn main() -> Result<(), BoxError> {
    lifecycle::run(std::env::args_os()).map_err(Into::into)
}

#[cfg(not(unix))]
fn main() -> Result<(), BoxError> {
    Err("pg_worker is only supported on Unix hosts".into())
}

#[cfg(unix)]
mod lifecycle {
    use super::BoxError;
    use camino::{Utf8Path, Utf8PathBuf};
    use nix::unistd::{Uid, User, initgroups, setgid, setuid};
    use pg_embedded_setup_unpriv::ambient_dir_and_path;
    use pg_embedded_setup_unpriv::worker::{PlainSecret, WorkerPayload};
    use postgresql_embedded::{PostgreSQL, Status};
    use std::ffi::{CString, OsString};
    use std::io::Read;
    use thiserror::Error;
    use tokio::runtime::Builder;

    const UNPRIVILEGED_USER: &str = "nobody";

    #[derive(Debug, Error)]
    pub enum WorkerError {
        #[error("invalid arguments: {0}")]
        InvalidArgs(String),
        #[error("failed to read payload {path}: {source}")]
        PayloadRead {
            path: Utf8PathBuf,
            #[source]
            source: BoxError,
        },
        #[error("failed to parse payload: {0}")]
        PayloadParse(#[from] serde_json::Error),
        #[error("invalid cluster settings: {0}")]
        Settings(String),
        #[error("failed to drop privileges: {0}")]
        PrivilegeDrop(String),
        #[error("failed to build runtime: {0}")]
        Runtime(#[source] std::io::Error),
        #[error("cluster {operation} failed: {message}")]
        Cluster {
            operation: &'static str,
            message: String,
        },
    }

    #[derive(Debug, Clone, Copy)]
    enum Operation {
        Setup,
        Start,
        Stop,
    }

    impl Operation {
        fn parse(raw: &str) -> Result<Self, WorkerError> {
            match raw {
                "setup" => Ok(Self::Setup),
                "start" => Ok(Self::Start),
                "stop" => Ok(Self::Stop),
                other => Err(WorkerError::InvalidArgs(format!(
                    "unknown operation '{other}'; expected setup, start or stop"
                ))),
            }
        }

        const fn as_str(self) -> &'static str {
            match self {
                Self::Setup => "setup",
                Self::Start => "start",
                Self::Stop => "stop",
            }
        }

        async fn apply(self, postgres: &mut PostgreSQL) -> Result<(), WorkerError> {
            let outcome = match self {
                Self::Setup => setup_and_start(postgres).await,
                Self::Start => start_if_stopped(postgres).await,
                Self::Stop => postgres.stop().await,
            };
            outcome.map_err(|err| WorkerError::Cluster {
                operation: self.as_str(),
                message: err.to_string(),
            })
        }
    }

    pub fn run(args: impl Iterator<Item = OsString>) -> Result<(), WorkerError> {
        let (operation, payload_path) = parse_args(args)?;
        let payload = load_payload(&payload_path)?;
        drop_privileges_if_root(UNPRIVILEGED_USER)?;
        let settings = payload
            .settings
            .into_settings()
            .map_err(|err| WorkerError::Settings(err.to_string()))?;
        apply_environment(&payload.environment);

        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(WorkerError::Runtime)?;
        let mut postgres = PostgreSQL::new(settings);
        runtime.block_on(operation.apply(&mut postgres))?;

        if matches!(operation, Operation::Start) {
            // The server must outlive this process.
            std::mem::forget(postgres);
        }
        Ok(())
    }

    fn parse_args(
        mut args: impl Iterator<Item = OsString>,
    ) -> Result<(Operation, Utf8PathBuf), WorkerError> {
        let _program = args.next();
        let mut next_utf8 = |what: &str| -> Result<String, WorkerError> {
            args.next()
                .ok_or_else(|| WorkerError::InvalidArgs(format!("missing {what} argument")))?
                .into_string()
                .map_err(|_| WorkerError::InvalidArgs(format!("{what} is not valid UTF-8")))
        };
        let operation = Operation::parse(&next_utf8("operation")?)?;
        let payload_path = Utf8PathBuf::from(next_utf8("payload path")?);
        if let Some(extra) = args.next() {
            return Err(WorkerError::InvalidArgs(format!(
                "unexpected extra argument: {}",
                extra.to_string_lossy()
            )));
        }
        Ok((operation, payload_path))
    }

    fn load_payload(path: &Utf8Path) -> Result<WorkerPayload, WorkerError> {
        let bytes = read_payload(path).map_err(|source| WorkerError::PayloadRead {
            path: path.to_owned(),
            source,
        })?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn read_payload(path: &Utf8Path) -> Result<Vec<u8>, BoxError> {
        let (dir, relative) = ambient_dir_and_path(path)?;
        let mut file = dir.open(relative.as_std_path())?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    fn drop_privileges_if_root(username: &str) -> Result<(), WorkerError> {
        if !Uid::effective().is_root() {
            return Ok(());
        }

        let user = User::from_name(username)
            .map_err(|err| WorkerError::PrivilegeDrop(err.to_string()))?
            .ok_or_else(|| WorkerError::PrivilegeDrop(format!("user '{username}' not found")))?;
        let user_name = CString::new(user.name.clone())
            .map_err(|err| WorkerError::PrivilegeDrop(err.to_string()))?;

        initgroups(&user_name, user.gid)
            .map_err(|err| WorkerError::PrivilegeDrop(err.to_string()))?;
        setgid(user.gid).map_err(|err| WorkerError::PrivilegeDrop(err.to_string()))?;
        setuid(user.uid).map_err(|err| WorkerError::PrivilegeDrop(err.to_string()))?;

        // SAFETY: no other threads exist yet.
        unsafe {
            std::env::set_var("HOME", &user.dir);
            std::env::set_var("USER", &user.name);
            std::env::set_var("LOGNAME", &user.name);
        }
        Ok(())
    }

    fn apply_environment(environment: &[(String, Option<PlainSecret>)]) {
        for (key, value) in environment {
            // SAFETY: called before the runtime starts, while single-threaded.
            unsafe {
                match value {
                    Some(secret) => std::env::set_var(key, secret.expose()),
                    None => std::env::remove_var(key),
                }
            }
        }
    }

    async fn setup_and_start(postgres: &mut PostgreSQL) -> Result<(), postgresql_embedded::Error> {
        postgres.setup().await?;
        start_if_stopped(postgres).await
    }

    async fn start_if_stopped(postgres: &mut PostgreSQL) -> Result<(), postgresql_embedded::Error> {
        if matches!(postgres.status(), Status::Started) {
            return Ok(());
        }
        postgres.start().await
    }
}

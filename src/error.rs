use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("could not determine the working directory")]
    WorkingDirectory,
    #[display("invalid configuration")]
    Config,
    #[display("could not open storage")]
    Storage,
    #[display("run aborted")]
    Run,
}

use derive_more::{Display, From};
use flume::{RecvError, SendError};
use tokio::task::JoinError;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Display, From)]
#[display("{self:?}")]
pub enum Error {
	#[from(String, &String, &str)]
	Custom(String),
	EventSend(String),
	EventRecv(RecvError),
	EbpfProgNotFound(&'static str),
	EbpfMapNotFound(&'static str),
	InvalidEventSize,
	UnknownDirection(u8),
	#[display("No attachment point of the selected capability is available on this kernel")]
	NoActivePoints,

	// -- Externals
	//
	#[from]
	JoinError(JoinError),
	#[from]
	AyaEbpf(aya::EbpfError),
	#[from]
	AyaMaps(aya::maps::MapError),
	#[from]
	AyaProgram(aya::programs::ProgramError),
	#[from]
	PerfBuffer(aya::maps::perf::PerfBufferError),
	#[from]
	Io(std::io::Error),
}

impl<T> From<SendError<T>> for Error {
	fn from(value: SendError<T>) -> Self {
		Self::EventSend(value.to_string())
	}
}

impl From<RecvError> for Error {
	fn from(err: RecvError) -> Self {
		Self::EventRecv(err)
	}
}

// region:    --- Custom

impl Error {
	pub fn custom(val: impl Into<String>) -> Self {
		Self::Custom(val.into())
	}
}

// endregion: --- Custom

// region:    --- Error Boilerplate

impl std::error::Error for Error {}

// endregion: --- Error Boilerplate

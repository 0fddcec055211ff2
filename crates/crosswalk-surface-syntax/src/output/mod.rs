//! Output writers - emit IR as source code.

pub mod emitter;

#[cfg(feature = "write-csharp")]
pub mod csharp;

#[cfg(feature = "write-csharp")]
pub use csharp::{CSHARP_WRITER, CSharpWriter, CSharpWriterImpl};

#[cfg(feature = "write-powershell")]
pub mod powershell;

#[cfg(feature = "write-powershell")]
pub use powershell::{POWERSHELL_WRITER, PowerShellWriter, PowerShellWriterImpl};

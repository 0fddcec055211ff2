//! Input readers - convert host syntax trees into IR.

#[cfg(feature = "read-powershell")]
pub mod powershell;

#[cfg(feature = "read-powershell")]
pub use powershell::{
    POWERSHELL_READER, PowerShellAdapter, PowerShellReader, read_powershell,
    read_powershell_with,
};

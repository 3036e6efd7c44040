use std::fmt::{Display, Formatter};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetTriple {
    pub architecture: Architecture,
    pub os: OperatingSystem,
}

impl TargetTriple {
    pub fn new(architecture: Architecture, os: OperatingSystem) -> Self {
        Self { architecture, os }
    }

    pub fn parse(s: &str) -> Result<Self, InvalidTriple> {
        let mut triple = s.split('-');

        let arch = Architecture::parse(triple.next().ok_or(InvalidTriple::InvalidFormat(s))?)?;
        let os = OperatingSystem::parse(triple.next().ok_or(InvalidTriple::InvalidFormat(s))?)?;

        if triple.next().is_none() {
            Ok(Self::new(arch, os))
        } else {
            Err(InvalidTriple::InvalidFormat(s))
        }
    }

    /// Size of a machine pointer (and therefore of a tagged value) in bytes.
    pub fn pointer_width(&self) -> usize {
        self.architecture.pointer_width()
    }
}

impl Display for TargetTriple {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.architecture, self.os)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Architecture {
    X64,
    Ia32,
    Arm,
    Arm64,
}

impl Architecture {
    fn parse(s: &str) -> Result<Self, InvalidTriple> {
        match s {
            "x64" => Ok(Self::X64),
            "ia32" => Ok(Self::Ia32),
            "arm" => Ok(Self::Arm),
            "arm64" => Ok(Self::Arm64),
            _ => Err(InvalidTriple::ArchitectureNotSupported),
        }
    }

    pub fn pointer_width(self) -> usize {
        match self {
            Self::X64 | Self::Arm64 => 8,
            Self::Ia32 | Self::Arm => 4,
        }
    }
}

impl Display for Architecture {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::X64 => write!(f, "x64"),
            Self::Ia32 => write!(f, "ia32"),
            Self::Arm => write!(f, "arm"),
            Self::Arm64 => write!(f, "arm64"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatingSystem {
    Linux,
    Macos,
    Windows,
}

impl OperatingSystem {
    fn parse(s: &str) -> Result<Self, InvalidTriple> {
        match s {
            "linux" => Ok(Self::Linux),
            "macos" => Ok(Self::Macos),
            "windows" => Ok(Self::Windows),
            _ => Err(InvalidTriple::OsNotSupported),
        }
    }
}

impl Display for OperatingSystem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linux => write!(f, "linux"),
            Self::Macos => write!(f, "macos"),
            Self::Windows => write!(f, "windows"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidTriple<'a> {
    #[error("the format of triple must be `architecture-os`: but got `{0}`")]
    InvalidFormat(&'a str),

    #[error("given architecture is not supported")]
    ArchitectureNotSupported,

    #[error("given operating system is not supported")]
    OsNotSupported,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test() {
        let target = "x64-linux";
        let triple = TargetTriple::parse(target).unwrap();

        assert_eq!(triple.architecture, Architecture::X64);
        assert_eq!(triple.os, OperatingSystem::Linux);
        assert_eq!(triple.pointer_width(), 8);
        assert_eq!(triple.to_string(), target);
    }

    #[test]
    fn pointer_width_32bit() {
        let triple = TargetTriple::parse("ia32-windows").unwrap();
        assert_eq!(triple.pointer_width(), 4);
        let triple = TargetTriple::parse("arm-linux").unwrap();
        assert_eq!(triple.pointer_width(), 4);
    }

    #[test]
    fn invalid_triples() {
        assert_eq!(
            TargetTriple::parse("x64"),
            Err(InvalidTriple::InvalidFormat("x64"))
        );
        assert_eq!(
            TargetTriple::parse("x64-linux-gnu"),
            Err(InvalidTriple::InvalidFormat("x64-linux-gnu"))
        );
        assert_eq!(
            TargetTriple::parse("mips-linux"),
            Err(InvalidTriple::ArchitectureNotSupported)
        );
        assert_eq!(
            TargetTriple::parse("arm64-haiku"),
            Err(InvalidTriple::OsNotSupported)
        );
    }
}

//! Recovery errors, their stable status codes and operator messages.

use std::io;
use std::path::PathBuf;

use mpc_recovery_backup::{BackupError, Layer};
use mpc_recovery_chains::CodecError;
use mpc_recovery_ckd::CkdError;
use mpc_recovery_core::{ScalarError, SeedError};
use thiserror::Error;

use crate::input::InputError;

/// Coarse classification of a recovery failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    KeyMaterial,
    ArchiveFormat,
    Decryption,
    NoMatchingBackup,
    Derivation,
    AddressEncoding,
}

/// Language of operator-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lang {
    #[default]
    En,
    Zh,
}

impl Lang {
    /// Anything that is not Chinese falls back to English.
    pub fn from_tag(tag: &str) -> Self {
        if tag.trim().to_ascii_lowercase().starts_with("zh") {
            Lang::Zh
        } else {
            Lang::En
        }
    }
}

#[derive(Error, Debug)]
pub enum RecoveryError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Seed(#[from] SeedError),

    #[error(transparent)]
    Backup(#[from] BackupError),

    #[error("Failed to read backup archive {path}: {source}")]
    ReadArchive { path: PathBuf, source: io::Error },

    #[error("Failed to assemble root keys: {0}")]
    Assemble(#[from] ScalarError),

    #[error(transparent)]
    Derivation(#[from] CkdError),
}

impl RecoveryError {
    /// Stable numeric status code.
    pub fn code(&self) -> &'static str {
        match self {
            RecoveryError::Input(e) => match e {
                InputError::Read { source, .. } if source.kind() == io::ErrorKind::NotFound => "501",
                InputError::Read { .. } | InputError::Parse(_) => "499",
                InputError::EmptyZipPath => "499",
                InputError::MnemonicWordCount(_) => "510",
                InputError::EmptyEciesKey => "514",
                InputError::EmptyRsaKey => "517",
                InputError::VaultCount(_) => "512",
                InputError::NoChains => "511",
                InputError::Chain(c) => codec_code(c),
            },
            RecoveryError::Seed(SeedError::WrongWordCount(_)) => "510",
            RecoveryError::Seed(_) => "502",
            RecoveryError::Backup(e) => match e {
                BackupError::EmptyEciesKey => "514",
                BackupError::InvalidEciesKey(_) => "503",
                BackupError::EmptyRsaKey => "517",
                BackupError::InvalidRsaKey(_) => "504",
                BackupError::InvalidUserKey(_) => "502",
                BackupError::Archive(_) => "515",
                BackupError::MalformedRecord { .. } | BackupError::MalformedField { .. } => "518",
                BackupError::Decryption { layer, .. } | BackupError::Encryption { layer, .. } => {
                    match layer {
                        Layer::RsaOaep => "506",
                        Layer::Ecies => "507",
                    }
                }
                BackupError::NoMatchingBackup => "505",
            },
            RecoveryError::ReadArchive { source, .. } if source.kind() == io::ErrorKind::NotFound => {
                "501"
            }
            RecoveryError::ReadArchive { .. } => "515",
            RecoveryError::Assemble(_) => "508",
            RecoveryError::Derivation(e) => match e {
                CkdError::DeriveChildAddress { .. } => "509",
                CkdError::Chain(c) => codec_code(c),
                CkdError::InvalidVaultCount => "512",
                CkdError::HardenedIndex(_)
                | CkdError::InvalidPath(_)
                | CkdError::ZeroTweak { .. }
                | CkdError::DeriveChildPriv { .. }
                | CkdError::ThreadPool(_)
                | CkdError::Scalar(_) => "508",
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self.code() {
            "502" | "503" | "504" => ErrorKind::KeyMaterial,
            "501" | "515" | "518" => ErrorKind::ArchiveFormat,
            "506" | "507" => ErrorKind::Decryption,
            "505" => ErrorKind::NoMatchingBackup,
            "508" => ErrorKind::Derivation,
            "509" => ErrorKind::AddressEncoding,
            _ => ErrorKind::InvalidInput,
        }
    }

    /// Localized operator message, e.g. "Recovery failed: RSA key error."
    pub fn user_message(&self, lang: Lang) -> String {
        let prefix = match lang {
            Lang::En => "Recovery failed: ",
            Lang::Zh => "恢复失败：",
        };
        format!("{}{}", prefix, message(self.code(), lang))
    }
}

fn codec_code(e: &CodecError) -> &'static str {
    match e {
        CodecError::EmptyChainName => "511",
        CodecError::UnsupportedChain(_) => "513",
        CodecError::UnknownCoinType(_) | CodecError::CurveMismatch { .. } => "509",
    }
}

fn message(code: &str, lang: Lang) -> &'static str {
    match lang {
        Lang::En => match code {
            "499" => "Parameter error.",
            "501" => "File not found.",
            "502" => "Mnemonic error.",
            "503" => "ECIES key error.",
            "504" => "RSA key error.",
            "505" => "No backup data matching the mnemonic phrase.",
            "506" => "RSA decryption of backup data failed.",
            "507" => "ECIES decryption of backup data failed.",
            "508" => "Child private key derivation failed.",
            "509" => "Address derivation failed.",
            "510" => "Mnemonic must be 24 words.",
            "511" => "Chain name should not be empty.",
            "512" => "Wallet quantity must be greater or equal than 1.",
            "513" => "Chain parameter error.",
            "514" => "ECIES key should not be empty.",
            "515" => "File format error.",
            "517" => "RSA key should not be empty.",
            "518" => "Failed to parse backup data.",
            _ => "System error.",
        },
        Lang::Zh => match code {
            "499" => "参数错误",
            "501" => "文件找不到",
            "502" => "助记词错误",
            "503" => "ECIES密钥错误",
            "504" => "RSA密钥错误",
            "505" => "没有找到与助记词匹配的备份数据",
            "506" => "RSA解密备份数据失败",
            "507" => "ECIES解密备份数据失败",
            "508" => "子私钥推导失败",
            "509" => "地址推导失败",
            "510" => "助记词必须为24个单词",
            "511" => "链名不能为空",
            "512" => "钱包数量必须大于等于1",
            "513" => "链参数错误",
            "514" => "ECIES密钥不能为空",
            "515" => "文件格式错误",
            "517" => "RSA密钥不能为空",
            "518" => "解析备份数据失败",
            _ => "系统错误",
        },
    }
}

//! Mintvault chain access
//!
//! On-chain side of the backup pipeline:
//!
//! - [`Pubkey`]: strongly-typed 32-byte address with base58 text form
//! - [`derive_metadata_address`]: deterministic metadata account location
//! - [`decode_metadata_account`]: fixed-layout binary decoding
//! - [`RpcClient`]: account reads over JSON-RPC
//! - [`MintIdentity`]: mint facts plus non-fungible validation
//!
//! # Example
//!
//! ```rust,ignore
//! use mintvault_chain::{derive_metadata_address, decode_metadata_account, RpcClient};
//!
//! let metadata_address = derive_metadata_address(&mint)?;
//! let account = rpc.get_account_info(&metadata_address).await?;
//! let metadata = decode_metadata_account(&account.data)?;
//! println!("uri: {}", metadata.uri);
//! ```

#![warn(unreachable_pub)]

mod error;
mod metadata;
mod mint;
mod pda;
mod pubkey;
mod rpc;

pub use error::{ChainError, DecodeError};
pub use metadata::{
    decode_metadata_account, MetadataAccount, MetadataField, MAX_NAME_LEN, MAX_SYMBOL_LEN,
    MAX_URI_LEN, METADATA_ACCOUNT_TAG,
};
pub use mint::{decode_mint_account, MintIdentity};
pub use pda::{derive_metadata_address, find_program_address, PdaError, TOKEN_METADATA_PROGRAM_ID};
pub use pubkey::{Pubkey, PubkeyError};
pub use rpc::{AccountData, RpcClient, TokenAccountView, TOKEN_PROGRAM_ID};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

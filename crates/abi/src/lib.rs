//! Cairo ABI model and codec.
//!
//! [`schema::parse_abi`] turns a raw ABI JSON array into a queryable [`schema::Abi`]; [`codec`]
//! encodes/decodes calldata, outputs and events against it; [`class_hash`] derives Sierra and
//! compiled class hashes from the artifacts a `starknet_addDeclareTransaction` call needs to
//! build and hash.

pub mod class_hash;
pub mod codec;
pub mod error;
pub mod schema;
pub mod types;

pub use codec::{decode_calldata, decode_event, decode_outputs, encode_calldata, CallArgs, DecodedEvent, DecodedOutput};
pub use error::AbiError;
pub use schema::{parse_abi, Abi, AbiEvent, AbiFunction, EnumDef, EventMemberKind, EventShape, StateMutability, StructDef};
pub use types::{CairoType, CairoValue};

//! Procedural macros for the `starknet-client-primitives` crate.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use starknet_types_core::felt::{Felt, NonZeroFelt};
use syn::parse::{Parse, ParseStream};
use syn::{parse_macro_input, LitStr, Token};

/// 2 ** 251 - 256
const ADDR_BOUND: NonZeroFelt = NonZeroFelt::from_raw([
    576459263475590224,
    18446744073709255680,
    160989183,
    18446743986131443745,
]);

const DEFAULT_CRATE_PATH: &str = "::starknet_client_primitives";

struct MacroInput {
    value: LitStr,
    crate_path: String,
}

impl Parse for MacroInput {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        let value: LitStr = input.parse()?;

        let crate_path = if input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
            input.parse::<TokenStream2>()?.to_string()
        } else {
            DEFAULT_CRATE_PATH.to_string()
        };

        Ok(MacroInput { value, crate_path })
    }
}

fn parse_felt(s: &str) -> Felt {
    if s.starts_with("0x") || s.starts_with("0X") {
        Felt::from_hex(s).expect("invalid Felt hex value")
    } else {
        Felt::from_dec_str(s).expect("invalid Felt decimal value")
    }
}

/// Defines a compile-time constant for a field element from its decimal or hexadecimal
/// representation.
///
/// ```ignore
/// use starknet_client_primitives::felt;
/// const X: Felt252 = felt!("0x1234");
/// ```
#[proc_macro]
pub fn felt(input: TokenStream) -> TokenStream {
    let MacroInput { value, crate_path } = parse_macro_input!(input as MacroInput);
    let felt_value = parse_felt(&value.value());
    let raw = felt_value.to_raw();

    format!(
        "{}::Felt252::from_raw_unchecked([{}, {}, {}, {}])",
        crate_path, raw[0], raw[1], raw[2], raw[3],
    )
    .parse()
    .unwrap()
}

/// Defines a compile-time constant for a [`ContractAddress`] from its decimal or hexadecimal
/// representation. The value is normalized (`value % ADDR_BOUND`) at compile time, matching
/// the runtime behavior of address derivation.
#[proc_macro]
pub fn address(input: TokenStream) -> TokenStream {
    let MacroInput { value, crate_path } = parse_macro_input!(input as MacroInput);
    let felt_value = parse_felt(&value.value());
    let normalized = felt_value.mod_floor(&ADDR_BOUND);
    let raw = normalized.to_raw();

    format!(
        "{}::ContractAddress::from_raw_unchecked([{}, {}, {}, {}])",
        crate_path, raw[0], raw[1], raw[2], raw[3],
    )
    .parse()
    .unwrap()
}

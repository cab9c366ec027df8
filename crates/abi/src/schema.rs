//! ABI parsing: flattening `interface` entries, building the schema of spec §3, and selector
//! computation (spec §4.2).

use std::collections::HashMap;

use serde::Deserialize;
use starknet_client_primitives::cairo::compute_selector;
use starknet_client_primitives::Felt252;

use crate::error::AbiError;
use crate::types::CairoType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateMutability {
    View,
    External,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AbiFunction {
    pub name: String,
    pub inputs: Vec<(String, CairoType)>,
    pub outputs: Vec<CairoType>,
    pub state_mutability: StateMutability,
    pub selector: Felt252,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventMemberKind {
    Key,
    Data,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventShape {
    /// A `#[derive(starknet::Event)]` struct: a flat list of key/data members.
    Struct(Vec<(String, CairoType, EventMemberKind)>),
    /// An event enum: selector routes to one nested variant's own event definition.
    Enum(Vec<(String, String)>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AbiEvent {
    pub name: String,
    pub shape: EventShape,
    pub selector: Felt252,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDef {
    pub name: String,
    pub members: Vec<(String, CairoType)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDef {
    pub name: String,
    /// `(variant name, payload type)`; `None` payload marks a unit variant.
    pub variants: Vec<(String, Option<CairoType>)>,
}

/// A parsed ABI: the bundle of lookups described in spec §3.
#[derive(Debug, Clone, Default)]
pub struct Abi {
    pub functions: HashMap<String, AbiFunction>,
    pub functions_by_selector: HashMap<Felt252, String>,
    pub events: HashMap<String, AbiEvent>,
    pub events_by_selector: HashMap<Felt252, String>,
    pub structs: HashMap<String, StructDef>,
    pub enums: HashMap<String, EnumDef>,
}

impl Abi {
    pub fn function(&self, name: &str) -> Result<&AbiFunction, AbiError> {
        self.functions.get(name).ok_or_else(|| AbiError::FunctionNotFound(name.to_string()))
    }

    pub fn function_by_selector(&self, selector: Felt252) -> Result<&AbiFunction, AbiError> {
        let name = self
            .functions_by_selector
            .get(&selector)
            .ok_or_else(|| AbiError::FunctionNotFound(selector.to_hex()))?;
        Ok(&self.functions[name])
    }

    pub fn event_by_selector(&self, selector: Felt252) -> Result<&AbiEvent, AbiError> {
        let name = self
            .events_by_selector
            .get(&selector)
            .ok_or_else(|| AbiError::EventNotFoundBySelector(selector))?;
        Ok(&self.events[name])
    }

    pub fn event(&self, name: &str) -> Result<&AbiEvent, AbiError> {
        self.events.get(name).ok_or_else(|| AbiError::EventNotFound(name.to_string()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RawEntry {
    Function(RawFunction),
    Constructor(RawFunction),
    L1Handler(RawFunction),
    Interface(RawInterface),
    Struct(RawStruct),
    Enum(RawEnumOrEvent),
    Event(RawEnumOrEvent),
    Impl(RawImpl),
}

#[derive(Debug, Deserialize)]
struct RawFunction {
    name: String,
    #[serde(default)]
    inputs: Vec<RawMember>,
    #[serde(default)]
    outputs: Vec<RawTyped>,
    #[serde(default)]
    state_mutability: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawInterface {
    #[serde(default)]
    items: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
struct RawImpl {
    #[serde(default)]
    interface_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawStruct {
    name: String,
    #[serde(default)]
    members: Vec<RawMember>,
}

#[derive(Debug, Deserialize)]
struct RawEnumOrEvent {
    name: String,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    variants: Vec<RawVariant>,
    #[serde(default)]
    members: Vec<RawVariant>,
}

#[derive(Debug, Deserialize)]
struct RawMember {
    name: String,
    #[serde(rename = "type")]
    ty: String,
}

#[derive(Debug, Deserialize)]
struct RawTyped {
    #[serde(rename = "type")]
    ty: String,
}

#[derive(Debug, Deserialize)]
struct RawVariant {
    name: String,
    #[serde(rename = "type", default)]
    ty: Option<String>,
    #[serde(default)]
    kind: Option<String>,
}

/// Parses a raw ABI JSON array into the queryable schema of spec §3.
///
/// `interface` entries are flattened (their nested functions promoted to the top level).
/// Duplicate function/event names are rejected; duplicate struct/enum definitions for the same
/// name are idempotent, conflicting ones fail (spec §4.2).
pub fn parse_abi(raw: &serde_json::Value) -> Result<Abi, AbiError> {
    let entries: Vec<RawEntry> = serde_json::from_value(raw.clone())
        .map_err(|e| AbiError::InvalidAbi(format!("malformed abi entry: {e}")))?;

    let mut abi = Abi::default();
    parse_entries(&entries, &mut abi)?;
    Ok(abi)
}

fn parse_entries(entries: &[RawEntry], abi: &mut Abi) -> Result<(), AbiError> {
    for entry in entries {
        match entry {
            RawEntry::Function(f) | RawEntry::Constructor(f) | RawEntry::L1Handler(f) => {
                insert_function(abi, f)?;
            }
            RawEntry::Interface(iface) => parse_entries(&iface.items, abi)?,
            RawEntry::Impl(_) => {}
            RawEntry::Struct(s) => insert_struct(abi, s)?,
            RawEntry::Enum(e) => insert_enum(abi, e)?,
            RawEntry::Event(e) => insert_event(abi, e)?,
        }
    }
    Ok(())
}

fn insert_function(abi: &mut Abi, f: &RawFunction) -> Result<(), AbiError> {
    if abi.functions.contains_key(&f.name) {
        return Err(AbiError::InvalidAbi(format!("duplicate function: {}", f.name)));
    }
    let selector = compute_selector(&f.name);
    let state_mutability = match f.state_mutability.as_deref() {
        Some("view") => StateMutability::View,
        _ => StateMutability::External,
    };
    let inputs = f.inputs.iter().map(|m| (m.name.clone(), CairoType::parse(&m.ty))).collect();
    let outputs = f.outputs.iter().map(|o| CairoType::parse(&o.ty)).collect();

    abi.functions_by_selector.insert(selector, f.name.clone());
    abi.functions.insert(
        f.name.clone(),
        AbiFunction { name: f.name.clone(), inputs, outputs, state_mutability, selector },
    );
    Ok(())
}

fn insert_struct(abi: &mut Abi, s: &RawStruct) -> Result<(), AbiError> {
    let members: Vec<(String, CairoType)> =
        s.members.iter().map(|m| (m.name.clone(), CairoType::parse(&m.ty))).collect();
    if let Some(existing) = abi.structs.get(&s.name) {
        if existing.members != members {
            return Err(AbiError::InvalidAbi(format!("conflicting struct definition: {}", s.name)));
        }
        return Ok(());
    }
    abi.structs.insert(s.name.clone(), StructDef { name: s.name.clone(), members });
    Ok(())
}

fn insert_enum(abi: &mut Abi, e: &RawEnumOrEvent) -> Result<(), AbiError> {
    let variants: Vec<(String, Option<CairoType>)> = e
        .variants
        .iter()
        .map(|v| {
            let ty = v.ty.as_deref().filter(|t| *t != "()").map(CairoType::parse);
            (v.name.clone(), ty)
        })
        .collect();
    if let Some(existing) = abi.enums.get(&e.name) {
        if existing.variants != variants {
            return Err(AbiError::InvalidAbi(format!("conflicting enum definition: {}", e.name)));
        }
        return Ok(());
    }
    abi.enums.insert(e.name.clone(), EnumDef { name: e.name.clone(), variants });
    Ok(())
}

fn insert_event(abi: &mut Abi, e: &RawEnumOrEvent) -> Result<(), AbiError> {
    if abi.events.contains_key(&e.name) {
        return Err(AbiError::InvalidAbi(format!("duplicate event: {}", e.name)));
    }
    let selector = compute_selector(&e.name);

    let shape = if e.kind.as_deref() == Some("enum") {
        let routes = e
            .variants
            .iter()
            .map(|v| (v.name.clone(), v.ty.clone().unwrap_or_default()))
            .collect();
        EventShape::Enum(routes)
    } else {
        let members = e
            .members
            .iter()
            .map(|m| {
                let kind = match m.kind.as_deref() {
                    Some("key") => EventMemberKind::Key,
                    _ => EventMemberKind::Data,
                };
                let ty = m.ty.clone().unwrap_or_default();
                (m.name.clone(), CairoType::parse(&ty), kind)
            })
            .collect();
        EventShape::Struct(members)
    };

    abi.events_by_selector.insert(selector, e.name.clone());
    abi.events.insert(e.name.clone(), AbiEvent { name: e.name.clone(), shape, selector });
    Ok(())
}

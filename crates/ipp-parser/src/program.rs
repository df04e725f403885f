use std::collections::BTreeSet;

use ipp_core::{
    ArgKind, ErrorKind, Instruction, IppError, Opcode, Operand, Program, Var, VarRef, VarType,
};

use crate::lexical;
use crate::xml::{parse_xml_document, XmlElementNode};

pub const LANGUAGE: &str = "IPPcode20";

/// Loads and validates a program document, returning instructions sorted by order.
pub fn parse_program_xml(source: &str) -> Result<Program, IppError> {
    let document = parse_xml_document(source)?;
    let program = build_program(&document.root)?;
    tracing::debug!(
        instructions = program.instructions.len(),
        name = program.name.as_deref().unwrap_or(""),
        "program loaded"
    );
    Ok(program)
}

fn struct_error(message: impl Into<String>) -> IppError {
    IppError::new(ErrorKind::XmlStruct, message)
}

fn build_program(root: &XmlElementNode) -> Result<Program, IppError> {
    if root.name != "program" {
        return Err(struct_error(format!(
            "Root element must be <program>, found <{}>.",
            root.name
        )));
    }
    let language = root.attribute("language").unwrap_or_default();
    if !language.eq_ignore_ascii_case(LANGUAGE) {
        return Err(struct_error(format!(
            "Unsupported language \"{}\", expected \"{}\".",
            language, LANGUAGE
        )));
    }

    let mut seen_orders = BTreeSet::new();
    let mut instructions = Vec::with_capacity(root.children.len());
    for node in &root.children {
        let instruction = build_instruction(node)?;
        if !seen_orders.insert(instruction.order) {
            return Err(struct_error(format!(
                "Duplicate instruction order {} (line {}).",
                instruction.order, node.line
            )));
        }
        instructions.push(instruction);
    }
    instructions.sort_by_key(|instruction| instruction.order);

    Ok(Program {
        name: root.attribute("name").map(str::to_string),
        description: root.attribute("description").map(str::to_string),
        instructions,
    })
}

fn build_instruction(node: &XmlElementNode) -> Result<Instruction, IppError> {
    if node.name != "instruction" {
        return Err(struct_error(format!(
            "Unexpected element <{}> on line {}.",
            node.name, node.line
        )));
    }

    let order = node
        .attribute("order")
        .and_then(|text| text.trim().parse::<u64>().ok())
        .filter(|order| *order > 0)
        .ok_or_else(|| {
            struct_error(format!(
                "Instruction on line {} needs a positive integer order.",
                node.line
            ))
        })?;

    let opcode_text = node.attribute("opcode").ok_or_else(|| {
        struct_error(format!("Instruction {} is missing its opcode.", order))
    })?;
    let opcode = Opcode::from_name(opcode_text.trim()).ok_or_else(|| {
        struct_error(format!(
            "Instruction {} has unknown opcode \"{}\".",
            order, opcode_text
        ))
    })?;

    let signature = opcode.signature();
    if node.children.len() != signature.len() {
        return Err(struct_error(format!(
            "{} (order {}) takes {} operand(s), found {}.",
            opcode,
            order,
            signature.len(),
            node.children.len()
        )));
    }

    let mut args = Vec::with_capacity(signature.len());
    for (index, kind) in signature.iter().enumerate() {
        let tag = format!("arg{}", index + 1);
        let mut matching = node.children.iter().filter(|child| child.name == tag);
        let (Some(arg), None) = (matching.next(), matching.next()) else {
            return Err(struct_error(format!(
                "{} (order {}) needs exactly one <{}>.",
                opcode, order, tag
            )));
        };
        let operand = build_operand(*kind, arg).map_err(|error| {
            struct_error(format!("{} (order {}) {}: {}", opcode, order, tag, error.message))
        })?;
        args.push(operand);
    }

    Ok(Instruction {
        order,
        opcode,
        args,
    })
}

fn build_operand(kind: ArgKind, node: &XmlElementNode) -> Result<Operand, IppError> {
    let arg_type = node
        .attribute("type")
        .ok_or_else(|| struct_error("missing type attribute"))?;
    let raw = node.text.as_deref().unwrap_or_default();

    match (kind, arg_type) {
        (ArgKind::Var | ArgKind::Symbol, "var") => {
            let text = raw.trim();
            if !lexical::is_var(text) {
                return Err(struct_error(format!("invalid variable \"{}\"", text)));
            }
            VarRef::parse(text)
                .map(Operand::Var)
                .ok_or_else(|| struct_error(format!("invalid variable \"{}\"", text)))
        }
        (ArgKind::Symbol, "string") => {
            if !lexical::is_string(raw) {
                return Err(struct_error(format!("invalid string literal \"{}\"", raw)));
            }
            Var::from_literal(VarType::String, raw).map(Operand::Const)
        }
        (ArgKind::Symbol, "int" | "bool" | "nil" | "float") => {
            let text = raw.trim();
            let valid = match arg_type {
                "int" => lexical::is_int(text),
                "bool" => lexical::is_bool(text),
                "nil" => lexical::is_nil(text),
                _ => lexical::is_float(text),
            };
            if !valid {
                return Err(struct_error(format!(
                    "invalid {} literal \"{}\"",
                    arg_type, text
                )));
            }
            let var_type = VarType::from_name(arg_type)
                .ok_or_else(|| struct_error(format!("unknown literal type \"{}\"", arg_type)))?;
            Var::from_literal(var_type, text).map(Operand::Const)
        }
        (ArgKind::Label, "label") => {
            let text = raw.trim();
            if !lexical::is_label(text) {
                return Err(struct_error(format!("invalid label \"{}\"", text)));
            }
            Ok(Operand::Label(text.to_string()))
        }
        (ArgKind::Type, "type") => {
            let text = raw.trim();
            if !lexical::is_type_name(text) {
                return Err(struct_error(format!("invalid type name \"{}\"", text)));
            }
            VarType::from_name(text)
                .map(Operand::Type)
                .ok_or_else(|| struct_error(format!("invalid type name \"{}\"", text)))
        }
        _ => Err(struct_error(format!(
            "type \"{}\" is not allowed here",
            arg_type
        ))),
    }
}

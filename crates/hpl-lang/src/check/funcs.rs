use super::types::Kinds;

/// Argument and result kinds of a builtin function.
pub(crate) struct Signature {
    pub argument: Kinds,
    pub result: Kinds,
}

const fn sig(argument: Kinds, result: Kinds) -> Signature {
    Signature { argument, result }
}

/// Builtins callable from conditions. Every builtin takes exactly one
/// argument.
pub(crate) fn signature(name: &str) -> Option<Signature> {
    let s = match name {
        "len" => sig(Kinds::ARRAY.union(Kinds::STRING), Kinds::NUMBER),
        "abs" | "sqrt" | "floor" | "ceil" | "log" | "sin" | "cos" | "tan" => {
            sig(Kinds::NUMBER, Kinds::NUMBER)
        }
        "int" | "float" => sig(Kinds::SCALAR, Kinds::NUMBER),
        "str" => sig(Kinds::SCALAR, Kinds::STRING),
        "bool" => sig(Kinds::SCALAR, Kinds::BOOL),
        _ => return None,
    };
    Some(s)
}

//! Value conversions between original and wire field types.

use crate::compat::TypeOracle;
use crate::fragment::Expr;
use crate::types::TypeRef;
use crate::wire::WireField;

/// Build an expression converting `value` of type `from` into type `to`.
///
/// Pointer-ness is reconciled first: a pointer source is dereferenced when
/// the target is not a pointer, and a non-pointer source has its address
/// taken when the target is one. If the adjusted source is then assignable
/// to `to` the value is used as is; otherwise an explicit conversion is
/// inserted.
pub fn conversion(oracle: &dyn TypeOracle, value: Expr, from: &TypeRef, to: &TypeRef) -> Expr {
    let (value, from) = match (from.elem(), to.is_pointer()) {
        (Some(elem), false) => (value.deref(), elem.clone()),
        (None, true) => (value.addr(), TypeRef::pointer(from.clone())),
        _ => (value, from.clone()),
    };
    if oracle.assignable(&from, to) {
        value
    } else {
        value.convert(to.clone())
    }
}

impl WireField {
    /// Original → wire: the value stored in the wire record when encoding.
    pub fn convert(&self, oracle: &dyn TypeOracle, receiver: &str) -> Expr {
        let value = Expr::ident(receiver).field(&self.name);
        conversion(oracle, value, &self.original.ty, &self.ty)
    }

    /// Wire → original: the value committed to the record when decoding.
    pub fn convert_back(&self, oracle: &dyn TypeOracle, decoded: &str) -> Expr {
        let value = Expr::ident(decoded).field(&self.name);
        conversion(oracle, value, &self.ty, &self.original.ty)
    }
}

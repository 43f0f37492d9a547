//! In-memory provider for records assembled programmatically.

use crate::compat::{TypeOracle, TypeUniverse};
use crate::record::Record;
use crate::traits::{LookupError, TypeProvider};
use crate::types::{Package, TypeRef};

/// Kind of a non-struct declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Other {
    /// A named type such as `type Count int`.
    Type,
    /// A function, variable or constant.
    Value,
}

/// A package whose records and type declarations are supplied directly.
#[derive(Debug, Clone)]
pub struct MemoryProvider {
    package: Package,
    records: Vec<Record>,
    /// Package-level identifiers that are not struct types.
    others: Vec<(String, Other)>,
    universe: TypeUniverse,
}

impl MemoryProvider {
    pub fn new(package: Package) -> Self {
        Self {
            package,
            records: Vec::new(),
            others: Vec::new(),
            universe: TypeUniverse::new(),
        }
    }

    /// Add a struct record; its fields become its underlying type.
    pub fn add_record(&mut self, record: Record) -> &mut Self {
        let underlying = TypeRef::Struct(
            record
                .fields
                .iter()
                .map(|f| crate::types::StructField {
                    name: f.name.clone(),
                    ty: f.ty.clone(),
                    tag: f.tag.clone(),
                    embedded: f.embedded,
                })
                .collect(),
        );
        self.universe
            .declare(&self.package, record.name.clone(), underlying);
        self.records.push(record);
        self
    }

    /// Declare a non-struct named type such as `type specialString string`.
    pub fn add_type(&mut self, name: impl Into<String>, underlying: TypeRef) -> &mut Self {
        let name = name.into();
        self.universe.declare(&self.package, name.clone(), underlying);
        self.others.push((name, Other::Type));
        self
    }

    /// Declare a package-level identifier that is not a type.
    pub fn add_value(&mut self, name: impl Into<String>) -> &mut Self {
        self.others.push((name.into(), Other::Value));
        self
    }
}

impl TypeProvider for MemoryProvider {
    fn package(&self) -> &Package {
        &self.package
    }

    fn lookup_record(&self, name: &str) -> Result<Record, LookupError> {
        if let Some(record) = self.records.iter().find(|r| r.name == name) {
            return Ok(record.clone());
        }
        match self.others.iter().find(|(n, _)| n == name) {
            Some((_, Other::Type)) => Err(LookupError::NotAStruct),
            Some((_, Other::Value)) => Err(LookupError::NotAType),
            None => Err(LookupError::NotFound),
        }
    }

    fn oracle(&self) -> &dyn TypeOracle {
        &self.universe
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldDescriptor;

    #[test]
    fn lookup_distinguishes_failures() {
        let pkg = Package::new("store", "example.com/store");
        let mut provider = MemoryProvider::new(pkg.clone());
        provider
            .add_record(Record::new(
                "Item",
                &pkg,
                vec![FieldDescriptor::new("ID", TypeRef::basic("string"))],
            ))
            .add_type("Count", TypeRef::basic("int"))
            .add_value("NewItem");

        assert_eq!(provider.lookup_record("Item").unwrap().fields.len(), 1);
        assert_eq!(provider.lookup_record("Count"), Err(LookupError::NotAStruct));
        assert_eq!(provider.lookup_record("NewItem"), Err(LookupError::NotAType));
        assert_eq!(provider.lookup_record("Missing"), Err(LookupError::NotFound));
    }
}

use std::sync::Arc;

use crate::error::{RuntimeError, RuntimeResult};

use super::{Name, TypeInfo, Val};

#[derive(Debug, Clone)]
pub struct RecordField {
    pub name: Name,
    pub ty: TypeInfo,
}

/// Fixed, ordered schema of a record type.
#[derive(Debug)]
pub struct RecordType {
    name: Name,
    fields: Vec<RecordField>,
}

impl RecordType {
    pub fn new<'a, I>(name: &str, fields: I) -> Arc<Self>
    where
        I: IntoIterator<Item = (&'a str, TypeInfo)>,
    {
        Arc::new(RecordType {
            name: Name::new(name),
            fields: fields
                .into_iter()
                .map(|(field, ty)| RecordField {
                    name: Name::new(field),
                    ty,
                })
                .collect(),
        })
    }

    #[inline]
    pub fn name(&self) -> &Name {
        &self.name
    }

    #[inline]
    pub fn fields(&self) -> &[RecordField] {
        &self.fields
    }

    #[inline]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn field_index(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name.eq_caseless(field))
    }
}

/// Record instance: one value per schema field, in schema order.
#[derive(Debug, Clone)]
pub struct RecordValue {
    ty: Arc<RecordType>,
    values: Arc<Vec<Val>>,
}

impl RecordValue {
    pub fn new(ty: Arc<RecordType>, values: Vec<Val>) -> RuntimeResult<Self> {
        if values.len() != ty.field_count() {
            return Err(RuntimeError::Internal(format!(
                "record {} has {} fields, {} values given",
                ty.name(),
                ty.field_count(),
                values.len()
            )));
        }
        Ok(RecordValue {
            ty,
            values: Arc::new(values),
        })
    }

    /// A record with every field set to null.
    pub fn empty(ty: Arc<RecordType>) -> Self {
        let values = vec![Val::Null; ty.field_count()];
        RecordValue {
            ty,
            values: Arc::new(values),
        }
    }

    #[inline]
    pub fn record_type(&self) -> &Arc<RecordType> {
        &self.ty
    }

    pub fn fetch(&self, field: &str) -> Option<&Val> {
        self.ty.field_index(field).map(|i| &self.values[i])
    }

    pub fn store(&mut self, field: &str, value: Val) -> bool {
        match self.ty.field_index(field) {
            Some(i) => {
                Arc::make_mut(&mut self.values)[i] = value;
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Name, &Val)> {
        self.ty.fields.iter().map(|f| &f.name).zip(self.values.iter())
    }

    #[inline]
    pub fn is_of_type(&self, ty: &Arc<RecordType>) -> bool {
        Arc::ptr_eq(&self.ty, ty)
    }
}

impl PartialEq for RecordValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.ty, &other.ty) && self.values == other.values
    }
}

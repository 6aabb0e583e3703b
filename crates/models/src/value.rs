//! sea-orm conversions for enums stored as text columns

use crate::{
    catalog::{DegreeType, UniversityType},
    review::{ReviewType, StudyYear},
};
use sea_orm::{
    ColIdx, DbErr, QueryResult, TryGetError, TryGetable, Value,
    sea_query::{ArrayType, ColumnType, Nullable, ValueType, ValueTypeErr},
};

macro_rules! text_value {
    ($ty:ty) => {
        impl ValueType for $ty {
            fn try_from(v: Value) -> Result<Self, ValueTypeErr> {
                match v {
                    Value::String(Some(s)) => s.parse().map_err(|_| ValueTypeErr),
                    _ => Err(ValueTypeErr),
                }
            }

            fn type_name() -> String {
                stringify!($ty).to_string()
            }

            fn array_type() -> ArrayType {
                ArrayType::String
            }

            fn column_type() -> ColumnType {
                ColumnType::Text
            }
        }

        impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::String(Some(Box::new(value.to_string())))
            }
        }

        impl TryGetable for $ty {
            fn try_get_by<I: ColIdx>(res: &QueryResult, index: I) -> Result<Self, TryGetError> {
                let val = String::try_get_by(res, index)?;

                val.parse().map_err(|_| {
                    TryGetError::DbErr(DbErr::Type(format!(
                        "Failed to parse {} from {val:?}",
                        stringify!($ty)
                    )))
                })
            }
        }

        impl Nullable for $ty {
            fn null() -> Value {
                Value::String(None)
            }
        }
    };
}

text_value!(UniversityType);
text_value!(DegreeType);
text_value!(ReviewType);
text_value!(StudyYear);

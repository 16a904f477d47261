//! Column type tags and schema extraction

use rustc_hash::FxHashMap;

use crate::error::ConvertError;

/// Element type of a list column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scalar {
    Int,
    Float,
    String,
    Any,
}

impl Scalar {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "int" => Some(Scalar::Int),
            "float" => Some(Scalar::Float),
            "string" => Some(Scalar::String),
            "any" => Some(Scalar::Any),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Scalar::Int => "int",
            Scalar::Float => "float",
            Scalar::String => "string",
            Scalar::Any => "any",
        }
    }

    fn ts_type(self) -> &'static str {
        match self {
            Scalar::Int | Scalar::Float => "number",
            Scalar::String => "string",
            Scalar::Any => "any",
        }
    }
}

/// Declared type of a column, read from the type row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Int,
    Float,
    String,
    Auto,
    /// `list,<scalar>`
    List(Scalar),
    /// `list,<list,<scalar>>`
    NestedList(Scalar),
}

impl TypeTag {
    /// TypeScript type used in interface declarations
    pub fn ts_type(self) -> String {
        match self {
            TypeTag::Int | TypeTag::Float => "number".to_string(),
            TypeTag::String => "string".to_string(),
            TypeTag::Auto => "any".to_string(),
            TypeTag::List(s) => format!("{}[]", s.ts_type()),
            TypeTag::NestedList(s) => format!("{}[][]", s.ts_type()),
        }
    }
}

impl std::str::FromStr for TypeTag {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        let unknown = || ConvertError::UnknownType(s.to_string());
        match tag {
            "int" => Ok(TypeTag::Int),
            "float" => Ok(TypeTag::Float),
            "string" => Ok(TypeTag::String),
            "auto" => Ok(TypeTag::Auto),
            _ => {
                let inner = tag.strip_prefix("list,").ok_or_else(unknown)?;
                if let Some(nested) = inner
                    .strip_prefix("<list,")
                    .and_then(|rest| rest.strip_suffix('>'))
                {
                    Scalar::parse(nested)
                        .map(TypeTag::NestedList)
                        .ok_or_else(unknown)
                } else {
                    Scalar::parse(inner).map(TypeTag::List).ok_or_else(unknown)
                }
            }
        }
    }
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeTag::Int => write!(f, "int"),
            TypeTag::Float => write!(f, "float"),
            TypeTag::String => write!(f, "string"),
            TypeTag::Auto => write!(f, "auto"),
            TypeTag::List(s) => write!(f, "list,{}", s.as_str()),
            TypeTag::NestedList(s) => write!(f, "list,<list,{}>", s.as_str()),
        }
    }
}

/// An exported column
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Exported field name
    pub name: String,
    /// 0-based column index in the sheet
    pub index: usize,
    pub ty: TypeTag,
}

/// Ordered exported columns of a sheet.
///
/// The first column is the primary key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    pub columns: Vec<Column>,
}

impl Schema {
    /// Attach declared types to selected columns.
    ///
    /// On failure returns the offending column index with the error.
    pub fn with_types(
        selected: Vec<(usize, String)>,
        type_row: &[String],
    ) -> Result<Self, (usize, ConvertError)> {
        let columns = selected
            .into_iter()
            .map(|(index, name)| {
                let raw = type_row.get(index).map(String::as_str).unwrap_or("");
                let ty = raw.parse::<TypeTag>().map_err(|e| (index, e))?;
                Ok(Column { name, index, ty })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { columns })
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Sheet column holding the primary key
    pub fn primary_key(&self) -> Option<usize> {
        self.columns.first().map(|c| c.index)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

/// Whether a slash-delimited group tag intersects the active groups
pub fn in_groups(tag: &str, groups: &[String]) -> bool {
    tag.split('/')
        .map(str::trim)
        .any(|t| groups.iter().any(|g| g == t))
}

/// Pick the named columns of a field row.
///
/// Columns are kept when their group tag intersects `groups`; an empty
/// `groups` keeps every column. A repeated name keeps only its last
/// column. The result is ordered by column index.
pub fn select_columns(
    field_row: &[String],
    group_row: Option<&[String]>,
    groups: &[String],
) -> Vec<(usize, String)> {
    let mut by_name: FxHashMap<&str, usize> = FxHashMap::default();

    for (index, name) in field_row.iter().enumerate() {
        if name.trim().is_empty() {
            continue;
        }
        if !groups.is_empty() {
            let tag = group_row
                .and_then(|row| row.get(index))
                .map(String::as_str)
                .unwrap_or("");
            if !in_groups(tag, groups) {
                continue;
            }
        }
        by_name.insert(name.as_str(), index);
    }

    let mut selected: Vec<(usize, String)> = by_name
        .into_iter()
        .map(|(name, index)| (index, name.to_string()))
        .collect();
    selected.sort_by_key(|(index, _)| *index);
    selected
}

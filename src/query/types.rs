use compact_str::CompactString;
use smallvec::SmallVec;

/// Type alias for small column vectors (typically < 8 elements)
pub type ColumnVec = SmallVec<[CompactString; 8]>;

/// Kind of a parsed statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StmtKind {
    Select,
    Insert,
    Update,
    Delete,
    Truncate,
    Drop,
    CreateTable,
    CreateIndex,
    CreateView,
    AlterTable,
    Other
}

/// A table reference with optional database qualifier and alias
#[derive(Debug, Clone)]
pub struct TableRef {
    pub db:    Option<CompactString>,
    pub name:  CompactString,
    pub alias: Option<CompactString>
}

/// An aliased select item (`expr AS alias` or `expr alias`)
#[derive(Debug, Clone)]
pub struct AliasPair {
    pub expr:  CompactString,
    pub alias: CompactString
}

/// Classification of a GROUP BY / ORDER BY key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Column,
    Literal,
    Position,
    Expression
}

/// A single GROUP BY or ORDER BY key
#[derive(Debug, Clone)]
pub struct SortKey {
    pub kind:      KeyKind,
    pub column:    Option<CompactString>,
    pub qualifier: Option<CompactString>
}

/// Shape of one `IN (...)` list
#[derive(Debug, Clone)]
pub struct InListMeta {
    pub len:       usize,
    pub has_null:  bool,
    pub has_ident: bool
}

/// Digest of one column definition from CREATE TABLE
#[derive(Debug, Clone, Default)]
pub struct ColumnMeta {
    pub name: CompactString,
    /// Lowercased rendering of the declared type, e.g. `varchar(3500)`
    pub type_text: CompactString,
    /// Lowercased rendering of the whole definition including options
    pub def_text: CompactString,
    /// First parenthesized number of the type, if any
    pub type_len: Option<u64>
}

/// Digest of one index / key declaration
#[derive(Debug, Clone, Default)]
pub struct KeyMeta {
    pub name:      CompactString,
    pub unique:    bool,
    pub primary:   bool,
    pub fulltext:  bool,
    pub col_count: usize
}

/// Digest of one CREATE TABLE statement
#[derive(Debug, Clone, Default)]
pub struct CreateTableMeta {
    pub db:          Option<CompactString>,
    pub name:        CompactString,
    pub temporary:   bool,
    pub columns:     Vec<ColumnMeta>,
    pub keys:        Vec<KeyMeta>,
    pub has_pk:      bool,
    pub has_unique:  bool,
    /// Columns of the primary key, in declaration order
    pub pk_cols:     Vec<CompactString>,
    /// A foreign key referencing the table itself
    pub fk_self_ref: bool
}

/// Digest of one INSERT / REPLACE statement
#[derive(Debug, Clone, Default)]
pub struct InsertMeta {
    pub has_columns: bool,
    pub row_count:   usize,
    pub from_select: bool,
    pub on_dup_key:  bool
}

/// Everything the rule bodies need, extracted from the parse trees in one
/// pass. Text-level facts (hints, engine clauses, keywords) stay on the raw
/// statement text; rules regex it directly.
#[derive(Debug, Clone, Default)]
pub struct QueryMeta {
    pub stmt_kinds: Vec<StmtKind>,

    // References
    pub tables:         Vec<TableRef>,
    pub select_aliases: Vec<AliasPair>,
    pub select_cols:    ColumnVec,
    pub agg_funcs:      Vec<CompactString>,

    // Projection shape
    pub has_wildcard:       bool,
    pub has_distinct:       bool,
    pub distinct_star:      bool,
    pub count_distinct_multi: bool,
    pub count_star:         bool,
    pub count_col_or_const: bool,
    pub sum_col:            bool,

    // Clause presence
    pub select_no_where: bool,
    pub delete_no_where: bool,
    pub update_no_where: bool,
    pub has_where:       bool,
    pub has_having:      bool,
    pub has_group_by:    bool,
    pub has_order_by:    bool,
    pub has_limit:       bool,
    pub has_offset:      bool,

    // Keys
    pub group_keys: Vec<SortKey>,
    pub order_keys: Vec<SortKey>,

    // WHERE facts
    pub where_cols:          ColumnVec,
    pub where_eq_cols:       ColumnVec,
    pub where_funcs:         Vec<CompactString>,
    pub where_is_null:       bool,
    pub where_null_or_cmp:   bool,
    pub or_same_col:         bool,
    pub where_always_true:   bool,
    pub where_always_false:  bool,
    pub where_chained_cmp:   bool,
    pub scalar_subquery_cmp: bool,
    pub update_set_and:      bool,

    // Predicates
    pub like_patterns: Vec<CompactString>,
    pub negated_match: bool,
    pub in_lists:      Vec<InListMeta>,
    pub in_subquery:   bool,

    // Subqueries
    pub subquery_depth:     usize,
    pub subquery_has_limit: bool,
    pub subquery_has_func:  bool,

    // Set operations
    pub has_union: bool,
    pub union_all: bool,
    pub union_outer_limit_inner_missing: bool,

    // Joins
    pub join_count:        usize,
    pub ansi_join:         bool,
    pub comma_join_tables: usize,
    pub multi_table_write: bool,

    // Per-statement digests
    pub insert:  Option<InsertMeta>,
    pub creates: Vec<CreateTableMeta>,
    pub indexes: Vec<KeyMeta>,

    // String literals encountered anywhere in the statement
    pub string_literals: Vec<CompactString>
}

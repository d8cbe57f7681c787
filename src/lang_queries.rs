//! Per-language tag queries: one combined tree-sitter query source per
//! [`Lang`](crate::lang::Lang), each using the `@definition.*`/`@reference.*`
//! capture convention with the identifier itself captured as `@name`.

use crate::lang::Lang;

const RUST_TAGS: &str = "
(function_item name: (identifier) @name) @definition.function
(struct_item name: (type_identifier) @name) @definition.struct
(enum_item name: (type_identifier) @name) @definition.enum
(trait_item name: (type_identifier) @name) @definition.trait
(impl_item type: (type_identifier) @name) @definition.impl
(const_item name: (identifier) @name) @definition.constant
(static_item name: (identifier) @name) @definition.constant
(type_item name: (type_identifier) @name) @definition.type
(mod_item name: (identifier) @name) @definition.module

(call_expression function: (identifier) @name) @reference.call
(call_expression function: (field_expression field: (field_identifier) @name)) @reference.call
(macro_invocation macro: (identifier) @name) @reference.call
(use_declaration argument: (identifier) @name) @reference.module
(use_declaration argument: (scoped_identifier name: (identifier) @name)) @reference.module
";

const PYTHON_TAGS: &str = "
(function_definition name: (identifier) @name) @definition.function
(class_definition name: (identifier) @name) @definition.class

(call function: (identifier) @name) @reference.call
(call function: (attribute attribute: (identifier) @name)) @reference.call
(import_statement name: (dotted_name) @name) @reference.module
(import_from_statement module_name: (dotted_name) @name) @reference.module
";

const JAVASCRIPT_TAGS: &str = "
(function_declaration name: (identifier) @name) @definition.function
(class_declaration name: (identifier) @name) @definition.class
(method_definition name: (property_identifier) @name) @definition.method
(variable_declarator
  name: (identifier) @name
  value: [(arrow_function) (function_expression)]) @definition.function

(call_expression function: (identifier) @name) @reference.call
(call_expression function: (member_expression property: (property_identifier) @name)) @reference.call
(new_expression constructor: (identifier) @name) @reference.call
(import_statement source: (string) @name) @reference.module
";

const TYPESCRIPT_TAGS: &str = "
(function_declaration name: (identifier) @name) @definition.function
(class_declaration name: (type_identifier) @name) @definition.class
(method_definition name: (property_identifier) @name) @definition.method
(interface_declaration name: (type_identifier) @name) @definition.interface
(type_alias_declaration name: (type_identifier) @name) @definition.type
(enum_declaration name: (identifier) @name) @definition.enum

(call_expression function: (identifier) @name) @reference.call
(call_expression function: (member_expression property: (property_identifier) @name)) @reference.call
(new_expression constructor: (identifier) @name) @reference.call
(import_statement source: (string) @name) @reference.module
";

const GO_TAGS: &str = "
(function_declaration name: (identifier) @name) @definition.function
(method_declaration name: (field_identifier) @name) @definition.method
(type_spec name: (type_identifier) @name) @definition.type

(call_expression function: (identifier) @name) @reference.call
(call_expression function: (selector_expression field: (field_identifier) @name)) @reference.call
(import_spec path: (interpreted_string_literal) @name) @reference.module
";

const JAVA_TAGS: &str = "
(class_declaration name: (identifier) @name) @definition.class
(interface_declaration name: (identifier) @name) @definition.interface
(enum_declaration name: (identifier) @name) @definition.enum
(method_declaration name: (identifier) @name) @definition.method

(method_invocation name: (identifier) @name) @reference.call
(object_creation_expression type: (type_identifier) @name) @reference.call
(import_declaration (scoped_identifier name: (identifier) @name)) @reference.module
";

const CSHARP_TAGS: &str = "
(class_declaration name: (identifier) @name) @definition.class
(interface_declaration name: (identifier) @name) @definition.interface
(enum_declaration name: (identifier) @name) @definition.enum
(struct_declaration name: (identifier) @name) @definition.struct
(method_declaration name: (identifier) @name) @definition.method

(invocation_expression function: (identifier) @name) @reference.call
(invocation_expression function: (member_access_expression name: (identifier) @name)) @reference.call
(object_creation_expression type: (identifier) @name) @reference.call
(using_directive (identifier) @name) @reference.module
";

const SWIFT_TAGS: &str = "
(function_declaration name: (simple_identifier) @name) @definition.function
(class_declaration name: (type_identifier) @name) @definition.class
(protocol_declaration name: (type_identifier) @name) @definition.interface
(struct_declaration name: (type_identifier) @name) @definition.struct
(enum_declaration name: (type_identifier) @name) @definition.enum

(import_declaration (identifier) @name) @reference.module
(type_identifier) @name @reference.type
";

/// The combined tags query source for a language, per spec §6's query-file
/// contract: one `.scm`-style pattern set per language, same source feeding
/// both the definition and reference indices.
#[must_use]
pub fn tags_query(lang: Lang) -> &'static str {
    match lang {
        Lang::Rust => RUST_TAGS,
        Lang::Python => PYTHON_TAGS,
        Lang::JavaScript => JAVASCRIPT_TAGS,
        Lang::TypeScript => TYPESCRIPT_TAGS,
        Lang::Tsx => TYPESCRIPT_TAGS,
        Lang::Go => GO_TAGS,
        Lang::Java => JAVA_TAGS,
        Lang::CSharp => CSHARP_TAGS,
        Lang::Swift => SWIFT_TAGS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_language_has_a_nonempty_query() {
        for lang in [
            Lang::Rust,
            Lang::Python,
            Lang::JavaScript,
            Lang::TypeScript,
            Lang::Tsx,
            Lang::Go,
            Lang::Java,
            Lang::CSharp,
            Lang::Swift,
        ] {
            assert!(!tags_query(lang).trim().is_empty());
        }
    }

    #[test]
    fn rust_query_declares_both_capture_families() {
        let q = tags_query(Lang::Rust);
        assert!(q.contains("@definition."));
        assert!(q.contains("@reference."));
        assert!(q.contains("@name"));
    }
}

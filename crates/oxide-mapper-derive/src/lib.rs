//! Derive macro for oxide-mapper entities.
//!
//! This crate provides the `#[derive(Entity)]` macro, which generates the
//! field descriptors the mapper walks to build schemas, statements and
//! relationships.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_macro_input, Attribute, Data, DeriveInput, Expr, Fields, Ident, Lit, Meta, Type,
};

/// Derives the `Entity` trait for a struct with named fields.
///
/// Fields are classified by their type:
///
/// - `PrimaryKey` - the primary key column
/// - `HasOne` - a has-one relation, stored as a foreign key column
/// - `HasMany` - a has-many relation, not stored on this table
/// - anything else - a scalar column; the type must implement `ScalarField`
///
/// # Field Attributes
///
/// - `#[column(name = "column_name")]` - Specifies the SQL column name
///   (optional, defaults to field name)
/// - `#[column(ignore)]` - Leaves the field out of the mapping entirely
/// - `#[relation(table = "table", on = "column")]` - Target of a relation.
///   `table` defaults to the column name. `on` defaults to `id` for
///   `HasOne` and is required for `HasMany`.
///
/// # Example
///
/// ```
/// use oxide_mapper::{Entity, HasMany, PrimaryKey};
///
/// #[derive(Default, Entity)]
/// struct Author {
///     id: PrimaryKey,
///     name: String,
///     #[relation(table = "story", on = "author")]
///     stories: HasMany,
/// }
///
/// let columns: Vec<&str> = Author::default()
///     .describe_fields()
///     .iter()
///     .map(|f| f.column)
///     .collect();
/// assert_eq!(columns, ["id", "name", "stories"]);
/// ```
///
/// A `HasMany` field must name the column that points back:
///
/// ```compile_fail
/// use oxide_mapper::{Entity, HasMany, PrimaryKey};
///
/// #[derive(Default, Entity)]
/// struct Author {
///     id: PrimaryKey,
///     #[relation(table = "story")]
///     stories: HasMany,
/// }
/// ```
///
/// `#[relation]` is rejected on anything but a relation field:
///
/// ```compile_fail
/// use oxide_mapper::{Entity, PrimaryKey};
///
/// #[derive(Default, Entity)]
/// struct Story {
///     id: PrimaryKey,
///     #[relation(table = "author")]
///     author: String,
/// }
/// ```
#[proc_macro_derive(Entity, attributes(column, relation))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive_entity_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn derive_entity_impl(input: DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Entity derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Entity derive only supports structs",
            ));
        }
    };

    let mut entity_fields: Vec<EntityField> = Vec::new();
    for field in fields {
        let Some(field_name) = field.ident.clone() else {
            continue;
        };
        let column_attrs = parse_column_attrs(&field.attrs)?;
        if column_attrs.ignore {
            continue;
        }

        let column_name = column_attrs.name.unwrap_or_else(|| field_name.to_string());
        let relation_attrs = parse_relation_attrs(&field.attrs)?;
        let shape = classify(&field.ty);

        let kind = match shape {
            Shape::PrimaryKey | Shape::Scalar => {
                if let Some(attr) = relation_attrs.attr {
                    return Err(syn::Error::new_spanned(
                        attr,
                        "#[relation] is only valid on HasOne and HasMany fields",
                    ));
                }
                if matches!(shape, Shape::PrimaryKey) {
                    FieldKind::PrimaryKey
                } else {
                    FieldKind::Scalar
                }
            }
            Shape::HasOne => FieldKind::HasOne {
                table: relation_attrs.table.unwrap_or_else(|| column_name.clone()),
                on: relation_attrs.on.unwrap_or_else(|| String::from("id")),
            },
            Shape::HasMany => {
                let Some(on) = relation_attrs.on else {
                    return Err(syn::Error::new_spanned(
                        &field_name,
                        "HasMany fields need #[relation(on = \"column\")] naming the \
                         foreign key column of the related table",
                    ));
                };
                FieldKind::HasMany {
                    table: relation_attrs.table.unwrap_or_else(|| column_name.clone()),
                    on,
                }
            }
        };

        entity_fields.push(EntityField {
            field_name,
            column_name,
            kind,
        });
    }

    let field_refs: Vec<TokenStream2> = entity_fields
        .iter()
        .map(|field| {
            let name = &field.field_name;
            let column = &field.column_name;
            let access = match &field.kind {
                FieldKind::PrimaryKey => quote! {
                    ::oxide_mapper::Access::PrimaryKey(&self.#name)
                },
                FieldKind::Scalar => quote! {
                    ::oxide_mapper::Access::Scalar(&self.#name)
                },
                FieldKind::HasOne { table, on } => quote! {
                    ::oxide_mapper::Access::HasOne(
                        &self.#name,
                        ::oxide_mapper::Relation::new(#table, #on),
                    )
                },
                FieldKind::HasMany { table, on } => quote! {
                    ::oxide_mapper::Access::HasMany(
                        &self.#name,
                        ::oxide_mapper::Relation::new(#table, #on),
                    )
                },
            };
            quote! { ::oxide_mapper::FieldRef::new(#column, #access) }
        })
        .collect();

    let field_muts: Vec<TokenStream2> = entity_fields
        .iter()
        .map(|field| {
            let name = &field.field_name;
            let column = &field.column_name;
            let access = match &field.kind {
                FieldKind::PrimaryKey => quote! {
                    ::oxide_mapper::AccessMut::PrimaryKey(&mut self.#name)
                },
                FieldKind::Scalar => quote! {
                    ::oxide_mapper::AccessMut::Scalar(&mut self.#name)
                },
                FieldKind::HasOne { table, on } => quote! {
                    ::oxide_mapper::AccessMut::HasOne(
                        &mut self.#name,
                        ::oxide_mapper::Relation::new(#table, #on),
                    )
                },
                FieldKind::HasMany { table, on } => quote! {
                    ::oxide_mapper::AccessMut::HasMany(
                        &mut self.#name,
                        ::oxide_mapper::Relation::new(#table, #on),
                    )
                },
            };
            quote! { ::oxide_mapper::FieldMut::new(#column, #access) }
        })
        .collect();

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::oxide_mapper::Entity for #struct_name #ty_generics #where_clause {
            fn describe_fields(&self) -> ::std::vec::Vec<::oxide_mapper::FieldRef<'_>> {
                ::std::vec![#(#field_refs),*]
            }

            fn describe_fields_mut(&mut self) -> ::std::vec::Vec<::oxide_mapper::FieldMut<'_>> {
                ::std::vec![#(#field_muts),*]
            }
        }
    };

    Ok(expanded)
}

struct EntityField {
    field_name: Ident,
    column_name: String,
    kind: FieldKind,
}

enum FieldKind {
    PrimaryKey,
    Scalar,
    HasOne { table: String, on: String },
    HasMany { table: String, on: String },
}

#[derive(Clone, Copy)]
enum Shape {
    PrimaryKey,
    HasOne,
    HasMany,
    Scalar,
}

/// Classifies a field by the last segment of its type path, so both
/// `HasOne` and `oxide_mapper::HasOne` are recognised.
fn classify(ty: &Type) -> Shape {
    let Type::Path(path) = ty else {
        return Shape::Scalar;
    };
    match path.path.segments.last() {
        Some(segment) if segment.ident == "PrimaryKey" => Shape::PrimaryKey,
        Some(segment) if segment.ident == "HasOne" => Shape::HasOne,
        Some(segment) if segment.ident == "HasMany" => Shape::HasMany,
        _ => Shape::Scalar,
    }
}

#[derive(Default)]
struct ColumnAttrs {
    name: Option<String>,
    ignore: bool,
}

#[derive(Default)]
struct RelationAttrs<'a> {
    attr: Option<&'a Attribute>,
    table: Option<String>,
    on: Option<String>,
}

fn parse_column_attrs(attrs: &[Attribute]) -> syn::Result<ColumnAttrs> {
    let mut result = ColumnAttrs::default();

    for attr in attrs {
        if attr.path().is_ident("column") {
            // Handle empty attribute like #[column]
            if matches!(attr.meta, Meta::Path(_)) {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("ignore") {
                    result.ignore = true;
                } else if meta.path.is_ident("name") {
                    result.name = Some(parse_string(&meta)?);
                } else {
                    return Err(meta.error("expected `name = \"...\"` or `ignore`"));
                }
                Ok(())
            })?;
        }
    }

    Ok(result)
}

fn parse_relation_attrs(attrs: &[Attribute]) -> syn::Result<RelationAttrs<'_>> {
    let mut result = RelationAttrs::default();

    for attr in attrs {
        if attr.path().is_ident("relation") {
            result.attr = Some(attr);
            if matches!(attr.meta, Meta::Path(_)) {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("table") {
                    result.table = Some(parse_string(&meta)?);
                } else if meta.path.is_ident("on") {
                    result.on = Some(parse_string(&meta)?);
                } else {
                    return Err(meta.error("expected `table = \"...\"` or `on = \"...\"`"));
                }
                Ok(())
            })?;
        }
    }

    Ok(result)
}

fn parse_string(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<String> {
    let value: Expr = meta.value()?.parse()?;
    if let Expr::Lit(lit) = &value {
        if let Lit::Str(s) = &lit.lit {
            return Ok(s.value());
        }
    }
    Err(syn::Error::new_spanned(value, "expected a string literal"))
}

use proc_macro::TokenStream;

mod has_rtype;
mod utils;

/// Attribute macro for implementing [`HasRType`](../dbn/record/trait.HasRType.html),
/// `Record`, `RecordMut`, and `AsRef<[u8]>` for a record struct given the `rtype`
/// value(s) that identify it on the wire.
///
/// # Errors
/// This macro returns a compile error if no rtypes are specified.
#[proc_macro_attribute]
pub fn dbn_record(attr: TokenStream, input: TokenStream) -> TokenStream {
    has_rtype::attribute_macro_impl(attr, input)
}

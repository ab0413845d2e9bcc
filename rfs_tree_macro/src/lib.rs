extern crate proc_macro;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse::Parser, parse_macro_input, Expr, ItemFn, ReturnType};

/// Turns a function taking the sandbox root into a `#[test]`.
///
/// ```rust,ignore
/// const CONFIG: &str = r#"
/// - !file
///     name: test.txt
///     content: !inline_text "Hello, world!"
/// "#;
///
/// #[tree_test(config = CONFIG)]
/// fn reads_file(root: &std::path::Path) -> std::io::Result<()> {
///     assert_eq!(std::fs::read_to_string(root.join("test.txt"))?, "Hello, world!");
///     Ok(())
/// }
/// ```
///
/// The tree is built into a fresh temporary directory, which is removed after the
/// body returns. An `Err` from the body fails the test.
#[proc_macro_attribute]
pub fn tree_test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input_fn = parse_macro_input!(item as ItemFn);
    let fn_attrs = &input_fn.attrs;
    let fn_name = &input_fn.sig.ident;
    let fn_inputs = &input_fn.sig.inputs;
    let fn_output = &input_fn.sig.output;
    let fn_block = &input_fn.block;

    let attr_parser = |stream: TokenStream2| -> Result<Option<Expr>, syn::Error> {
        let mut config = None;

        let parser = syn::meta::parser(|meta| {
            if meta.path.is_ident("config") {
                config = Some(meta.value()?.parse::<Expr>()?);
            } else {
                return Err(meta.error("unsupported attribute"));
            }
            Ok(())
        });

        parser.parse2(stream)?;
        Ok(config)
    };

    let config = match attr_parser(attr.into()) {
        Ok(Some(config)) => quote! { #config },
        // an empty sandbox
        Ok(None) => quote! { "[]" },
        Err(err) => return err.to_compile_error().into(),
    };

    if fn_inputs.len() != 1 {
        return syn::Error::new_spanned(
            &input_fn.sig,
            "tree_test functions take exactly one argument: the sandbox root",
        )
        .to_compile_error()
        .into();
    }

    let check_outcome = match fn_output {
        ReturnType::Default => quote! { let () = outcome; },
        ReturnType::Type(..) => quote! {
            if let Err(e) = outcome {
                panic!("inner test has error: {}", e);
            }
        },
    };

    let expanded = quote! {
        #[test]
        #(#fn_attrs)*
        fn #fn_name() {
            let config: &str = #config;
            let (root, teardown) = ::rfs_tree::temp_create_dir(config.as_bytes())
                .unwrap_or_else(|e| panic!("failed to build the test tree: {}", e));

            let test_proc = |#fn_inputs| #fn_output #fn_block;
            let outcome = test_proc(root.as_path());

            teardown.run();
            #check_outcome
        }
    };

    TokenStream::from(expanded)
}

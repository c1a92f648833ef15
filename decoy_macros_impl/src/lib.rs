use proc_macro2::TokenStream;
use quote::{quote, ToTokens};

const USAGE: &str = "decoy::call! only accepts arguments in the format of: `call!(receiver.method(args...))`, `call!(receiver.property)` or `call!(receiver[index])`";

pub fn call_impl(input: syn::Expr) -> TokenStream {
    match input {
        syn::Expr::Field(syn::ExprField {
            base,
            member: syn::Member::Named(ident),
            ..
        }) => {
            let name = ident.to_string();
            quote!({ decoy::CallSpec::property(&(#base), #name) })
        }
        syn::Expr::MethodCall(syn::ExprMethodCall {
            receiver,
            method,
            args,
            turbofish,
            ..
        }) => {
            if let Some(turbofish) = turbofish {
                return darling::Error::custom(
                    "decoy::call! does not support generic methods; remove the turbofish",
                )
                .with_span(&turbofish)
                .write_errors();
            }

            let name = method.to_string();
            match args
                .into_iter()
                .map(expr_to_constraint)
                .collect::<darling::Result<Vec<_>>>()
            {
                Err(e) => e.write_errors(),
                Ok(args) => {
                    quote!({ decoy::CallSpec::method(&(#receiver), #name) #(.arg(#args))* })
                }
            }
        }
        syn::Expr::Index(syn::ExprIndex { expr, index, .. }) => {
            let index = match *index {
                // `fake[(i, j)]` is how multi-argument indexers are spelled
                syn::Expr::Tuple(syn::ExprTuple { elems, .. }) => elems.into_iter().collect(),
                syn::Expr::Paren(syn::ExprParen { expr, .. }) => vec![*expr],
                index => vec![index],
            };

            match index
                .into_iter()
                .map(expr_to_constraint)
                .collect::<darling::Result<Vec<_>>>()
            {
                Err(e) => e.write_errors(),
                Ok(args) => quote!({ decoy::CallSpec::index(&(#expr)) #(.arg(#args))* }),
            }
        }
        expr => darling::Error::custom(USAGE).with_span(&expr).write_errors(),
    }
}

fn expr_to_constraint(expr: syn::Expr) -> darling::Result<TokenStream> {
    match &expr {
        syn::Expr::Infer(_) => Ok(quote! { decoy::Constraint::any() }),
        syn::Expr::Assign(syn::ExprAssign { left, right, .. }) => match left.as_ref() {
            syn::Expr::Infer(_) => Ok(quote! { decoy::Constraint::matching(#right) }),
            _ => Ok(quote! { decoy::Constraint::eq(#expr) }),
        },
        syn::Expr::Binary(syn::ExprBinary {
            left, op, right, ..
        }) => match (left.as_ref(), op) {
            (syn::Expr::Infer(_), syn::BinOp::Eq(_)) => {
                Ok(quote! { decoy::Constraint::eq(#right) })
            }
            (syn::Expr::Infer(_), _) => Err(darling::Error::custom(format!(
                "decoy::call! does not handle argument matchers with syntax: '{}'",
                expr.to_token_stream()
            ))
            .with_span(&expr)),
            _ => Ok(quote! { decoy::Constraint::eq(#expr) }),
        },
        arg => Ok(quote! { decoy::Constraint::eq(#arg) }),
    }
}

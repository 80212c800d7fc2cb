//! Renders the API wrapper functions a tag's test scripts call.
//!
//! Output is a fragment meant to be merged into the API class of the suite:
//! a comment block listing the endpoint attributes the class constructor has
//! to define, then one method per endpoint.

use super::context::{anonymous, PathParam, RenderContext};
use super::layout::{python_string, Code};
use super::settings::RenderSettings;
use crate::model::{Endpoint, Verb};

const LOGGER: &str = "self.cluster_ops_API_log";

fn request_method(verb: Verb) -> &'static str {
    match verb {
        Verb::Get | Verb::List => "capella_api_get",
        Verb::Create => "capella_api_post",
        Verb::Update => "capella_api_put",
        Verb::Delete => "capella_api_del",
    }
}

/// Log sentence, innermost resource first: "Fetching the cluster {} in project {} in organization {}".
fn log_sentence(ctx: &RenderContext) -> (String, Vec<String>) {
    let endpoint = ctx.endpoint;
    let item_form = endpoint.path.trim_end_matches('/').ends_with('}');
    let mut params: Vec<&PathParam> = ctx.params.iter().collect();

    let mut sentence = match endpoint.verb {
        Verb::List => format!("Listing all the {}", ctx.resource.replace('_', " ") + "s"),
        Verb::Create => format!("Creating a {}", ctx.resource.replace('_', " ")),
        Verb::Get | Verb::Update | Verb::Delete if item_form => {
            let own = params.pop();
            let verb = match endpoint.verb {
                Verb::Get => "Fetching",
                Verb::Update => "Updating",
                _ => "Deleting",
            };
            match own {
                Some(p) => format!("{} the {} {{}}", verb, p.label),
                None => format!("{} the {}", verb, ctx.resource.replace('_', " ")),
            }
        }
        Verb::Get => format!("Fetching the {}", ctx.resource.replace('_', " ")),
        Verb::Update => format!("Updating the {}", ctx.resource.replace('_', " ")),
        Verb::Delete => format!("Deleting the {}", ctx.resource.replace('_', " ")),
    };

    let mut args: Vec<String> = Vec::new();
    if item_form && matches!(endpoint.verb, Verb::Get | Verb::Update | Verb::Delete) {
        if let Some(last) = ctx.params.last() {
            args.push(last.name.clone());
        }
    }
    for p in params.iter().rev() {
        sentence.push_str(&format!(" in {} {{}}", p.label));
        args.push(p.name.clone());
    }
    (sentence, args)
}

/// One wrapper method.
pub fn render_wrapper_function(endpoint: &Endpoint, settings: &RenderSettings) -> String {
    let ctx = RenderContext::new(endpoint, &settings.conventions);
    let item_form = endpoint.path.trim_end_matches('/').ends_with('}');
    let mut code = Code::new();

    code.line(1, format!("def {}(", endpoint.function_name));
    code.line(3, "self,");
    for param in &ctx.params {
        code.line(3, format!("{},", param.name));
    }
    for field in &endpoint.required_payload_fields {
        code.line(3, format!("{},", field));
    }
    if endpoint.verb == Verb::List {
        for query in &endpoint.query_parameters {
            code.line(3, format!("{}=None,", query));
        }
    }
    code.line(3, "headers=None,");
    code.line(3, "**kwargs):");

    if !endpoint.description.is_empty() {
        code.line(2, "\"\"\"");
        code.block(2, &endpoint.description);
        code.line(2, "\"\"\"");
    }

    let (sentence, log_args) = log_sentence(&ctx);
    code.line(2, format!("{}.info(", LOGGER));
    code.line(3, format!("{}.format({}))", python_string(&sentence), log_args.join(", ")));

    match endpoint.verb {
        Verb::Create | Verb::Update => {
            code.line(2, "params = {");
            for field in &endpoint.required_payload_fields {
                code.line(3, format!("\"{}\": {},", field, field));
            }
            code.line(2, "}");
            code.line(2, "for k, v in kwargs.items():");
            code.line(3, "params[k] = v");
        }
        Verb::List => {
            code.line(2, "params = {}");
            for query in &endpoint.query_parameters {
                code.line(2, format!("if {} is not None:", query));
                code.line(3, format!("params[\"{}\"] = {}", query, query));
            }
            code.line(2, "for k, v in kwargs.items():");
            code.line(3, "params[k] = v");
        }
        Verb::Get | Verb::Delete => {
            code.line(2, "if kwargs:");
            code.line(3, "params = kwargs");
            code.line(2, "else:");
            code.line(3, "params = None");
        }
    }
    code.blank();

    let names: Vec<String> = ctx.params.iter().map(|p| p.name.clone()).collect();
    let url = if item_form && !names.is_empty() {
        let (own, parents) = names.split_last().map(|(l, p)| (l.clone(), p.join(", "))).unwrap_or_default();
        format!("\"{{}}/{{}}\".format(self.{}.format({}), {})", ctx.endpoint_attr, parents, own)
    } else {
        format!("self.{}.format({})", ctx.endpoint_attr, names.join(", "))
    };
    code.line(2, format!("resp = self.{}(", request_method(endpoint.verb)));
    code.line(3, format!("{},", url));
    code.line(3, "params, headers)");
    code.line(2, "return resp");

    code.finish()
}

/// The wrapper module for every endpoint of one tag.
pub fn render_wrapper_module(endpoints: &[Endpoint], settings: &RenderSettings) -> String {
    let mut attributes: Vec<(String, String)> = Vec::new();
    for endpoint in endpoints {
        let ctx = RenderContext::new(endpoint, &settings.conventions);
        let url = anonymous(&endpoint.collection_url());
        if !attributes.iter().any(|(attr, _)| *attr == ctx.endpoint_attr) {
            attributes.push((ctx.endpoint_attr.clone(), url));
        }
    }

    let mut code = Code::new();
    code.block(0, &settings.header());
    code.blank();
    code.line(0, "# Endpoint attributes, to be set in the API class constructor:");
    for (attr, url) in &attributes {
        code.line(0, format!("#     self.{} = {}", attr, python_string(url)));
    }

    let mut out = code.finish();
    for endpoint in endpoints {
        out.push('\n');
        out.push_str(&render_wrapper_function(endpoint, settings));
    }
    out
}

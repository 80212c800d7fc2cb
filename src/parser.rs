// The parser module reads an OpenAPI document and selects the operations a generation request covers.

pub mod openapi;

pub use openapi::{
    order_for_linking,
    parse_spec_file,
    parse_spec_json,
    parse_spec_yaml,
    select_from_file,
    ApiOperation,
    ApiParameter,
    ApiPayload,
    ApiResponse,
    ApiSpec,
    ParserError,
    Result,
    Selector,
};

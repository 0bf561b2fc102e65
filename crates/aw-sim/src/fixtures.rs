//! SOAP response fixtures

use aw_protocol::{CodecError, PolymorphicCodec, SharedGroup};

const SOAP_NAMESPACE: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Wrap `rval` (the serialized result element) in a response envelope for `operation`
pub fn soap_response(operation: &str, rval: &str) -> Vec<u8> {
    format!(
        concat!(
            r#"<soap:Envelope xmlns:soap="{ns}">"#,
            "<soap:Header><ResponseHeader><requestId>sim</requestId>",
            "<operations>1</operations><responseTime>1</responseTime></ResponseHeader></soap:Header>",
            "<soap:Body><{op}Response>{rval}</{op}Response></soap:Body></soap:Envelope>"
        ),
        ns = SOAP_NAMESPACE,
        op = operation,
        rval = rval,
    )
    .into_bytes()
}

/// A `get` response holding one page of `entries` out of `total`
pub fn page_response<G: SharedGroup>(
    codec: &PolymorphicCodec<G>,
    entries: &[G],
    total: i64,
) -> Result<Vec<u8>, CodecError> {
    let mut rval = format!("<rval><totalNumEntries>{total}</totalNumEntries>");
    for entry in entries {
        let bytes = codec.encode_to_vec(entry, "entries")?;
        rval.push_str(&String::from_utf8_lossy(&bytes));
    }
    rval.push_str("</rval>");
    Ok(soap_response("get", &rval))
}

use std::net::Ipv4Addr;
use dns::{RecordData, ResourceRecord};
use domain_name_query_types::NameQuery;
use domain_name_resolver::Resolution;

pub fn request_summary(name_query: &NameQuery, server: Ipv4Addr) -> String {
    format!(
        "DnsClient sending request for {}\nServer: {}\nRequest type: {}\n",
        name_query.name, server, name_query.q_type
    )
}

pub fn render_resolution(resolution: &Resolution) -> String {
    let response = &resolution.response;
    let mut out = format!(
        "Response received after {:.3} seconds ({} retries)\n",
        resolution.elapsed.as_secs_f64(),
        resolution.retries
    );

    if response.is_not_found() || response.answers().is_empty() {
        out.push_str("NOTFOUND\n");
        return out;
    }

    let auth = if response.authoritative() { "auth" } else { "nonauth" };

    out.push_str(&section("Answer", response.answers(), auth));
    if !response.additional().is_empty() {
        out.push_str(&section("Additional", response.additional(), auth));
    }

    out
}

fn section(title: &str, records: &[ResourceRecord], auth: &str) -> String {
    let mut lines = vec![format!("***{} Section ({} records)***", title, records.len())];
    lines.extend(records.iter().map(|record| record_line(record, auth)));
    lines.push(String::new());

    lines.join("\n")
}

pub fn render_error(description: &dyn std::fmt::Display) -> String {
    format!("ERROR\t{}", description)
}

fn record_line(record: &ResourceRecord, auth: &str) -> String {
    match record.data() {
        RecordData::A(addr) => format!("IP\t{}\t{}\t{}", addr, record.ttl(), auth),
        RecordData::Cname(alias) => format!("CNAME\t{}\t{}\t{}", alias, record.ttl(), auth),
        RecordData::Ns(alias) => format!("NS\t{}\t{}\t{}", alias, record.ttl(), auth),
        RecordData::Mx {
            preference,
            exchange,
        } => format!("MX\t{}\t{}\t{}\t{}", exchange, preference, record.ttl(), auth),
    }
}

/*!
 * Sample legal documents shaped like the output of the document generator
 */

/// Signature image block as embedded by the generator
pub fn signature_block(signer: &str, payload: &str) -> String {
    format!(
        r#"<div style="border-bottom:1px solid #000;"><img src="data:image/png;base64,iVBORw0KGgo{}" alt="{} signature"></div>"#,
        payload, signer
    )
}

/// HTML cover page followed by the separator
pub const COVER_PAGE: &str = r#"<div style="text-align:center; page-break-after: always;"><h1>SERVICE AGREEMENT</h1><p>Between (_____________) and (_____________)</p></div>"#;

/// Three short sections, well under every size limit
pub const THREE_SHORT_SECTIONS: &str = "## 1. DEFINITIONS\n\n\"Agreement\" means this document and its schedules.\n\n## 2. TERM\n\nThis Agreement starts on the signature date.\n\n## 3. GOVERNING LAW\n\nThe laws of Bangladesh apply.\n";

/// Three sections of 69, 65 and 56 chars; a limit of 80 keeps them apart
pub const THREE_SPLITTABLE_SECTIONS: &str = "## 1. DEFINITIONS\n\nServices means the work described in Schedule A.\n\n## 2. PAYMENT\n\nThe Client pays each invoice within thirty days.\n\n## 3. TERM\n\nThis Agreement ends on the completion date.\n";

/// Four blank placeholders and no cover page
pub const FOUR_PLACEHOLDERS: &str = "## 1. PARTIES\n\nThis Agreement is between (_____________) and (_____________).\n\n## 2. PAYMENT\n\nThe fee is (_____________) payable on (_____________).\n";

/// Cover page, citation link, four blank placeholders (two on the cover) and two
/// signature images inside a signatures section
pub fn service_agreement() -> String {
    format!(
        "{cover}\n\n---\n\n## 1. DEFINITIONS\n\n\"Services\" has the meaning given in <a href=\"https://law.example.org/act-12\" target=\"_blank\">Act 12</a>.\n\n## 2. PAYMENT\n\nThe Client shall pay (_____________) within (_____________) days.\n\n## SIGNATURES\n\n<div style=\"display:flex; gap:40px;\">\n{provider}\n{client}\n</div>\n",
        cover = COVER_PAGE,
        provider = signature_block("Provider", "AAAAProvider"),
        client = signature_block("Client", "BBBBClient"),
    )
}

/// One signature image outside any signatures section
pub fn signature_without_anchor() -> String {
    format!(
        "## 1. ACCEPTANCE\n\nAccepted by the Client:\n\n{}\n\n## 2. NOTICES\n\nNotices are sent in writing.\n",
        signature_block("Client", "CCCCClient")
    )
}

/// A document of `sections` numbered sections of roughly `section_len` chars
pub fn long_contract(sections: usize, section_len: usize) -> String {
    let mut document = String::from("This contract is made between the parties named below.\n\n");
    for i in 1..=sections {
        document.push_str(&format!("## {}. CLAUSE {}\n\n", i, i));
        let mut written = 0;
        let mut paragraph = 0;
        while written < section_len {
            let text = format!(
                "Paragraph {} of clause {} binds the parties as set out in <a href=\"https://law.example.org/{}\" target=\"_blank\">section {}</a> (_____________).\n\n",
                paragraph, i, i, paragraph
            );
            written += text.chars().count();
            document.push_str(&text);
            paragraph += 1;
        }
    }
    document
}

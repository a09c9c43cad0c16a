// Example usage of the meta_ads_fetcher library.
// Works offline on a canned response; swap in AdLibraryClient::fetch_ads
// with a real key to query the live API.

use anyhow::Result;
use meta_ads_fetcher::*;

fn main() -> Result<()> {
    // Example 1: Parse one page of search results
    let page_response = r#"{"results":[[{"pageName":"GlowCo","publisherPlatform":["FACEBOOK","INSTAGRAM"],"snapshot":{"title":"Glow Serum","creation_time":1704067200,"images":[{"original_image_url":"http://x/img.png"}]}}]],"continuation_token":"next-page"}"#;
    let page = parse_ads_page(page_response)?;
    println!("Next page token: {:?}", page.next_token());

    // Example 2: Flatten the ads into rows
    let ads = page.into_ads();
    let records = flatten_ads(&ads);
    for record in &records {
        println!("{:?} by {:?} at {:?}", record.title, record.page_name, record.creation_time);
    }

    // Example 3: Export to a spreadsheet
    let artifact = ExportArtifact::build(&records, ExportFormat::Xlsx)?;
    artifact.save(XLSX_FILE_NAME)?;
    println!("{} rows written to {} ({})", artifact.rows, XLSX_FILE_NAME, artifact.mime());

    Ok(())
}

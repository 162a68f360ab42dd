//! Replacing one sheet inside an existing package

use std::collections::{HashMap, HashSet};
use std::io::{Read, Seek, Write};

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use quick_xml::Writer;

use super::XlsxWriter;
use crate::book::validate_sheet_name;
use crate::error::{XlsxError, XlsxResult};
use crate::escape::escape_xml;
use crate::reader::XlsxReader;
use excel_sheet_core::SheetStore;

const CONTENT_TYPES: &str = "[Content_Types].xml";
const WORKBOOK: &str = "xl/workbook.xml";
const WORKBOOK_RELS: &str = "xl/_rels/workbook.xml.rels";

const WORKSHEET_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
const WORKSHEET_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";

/// An element appended as the last child of `parent`
struct Insert<'a> {
    /// Local name of the parent element
    parent: &'a [u8],
    /// Local name of the new element
    element: &'a str,
    /// Attribute names and unescaped values
    attributes: Vec<(String, String)>,
}

impl XlsxWriter {
    /// Copy the package `source` to `writer` with the sheet `sheet_name`
    /// holding `store`
    ///
    /// Only the target worksheet part is rewritten; every other part is
    /// copied without being decompressed. A missing sheet is appended after
    /// the existing ones, which also updates the workbook, its
    /// relationships and the content types. The calculation chain is
    /// dropped so Excel rebuilds it for the new sheet content.
    pub fn replace_sheet<R: Read + Seek, W: Write + Seek>(
        source: R,
        sheet_name: &str,
        store: &SheetStore,
        writer: W,
    ) -> XlsxResult<()> {
        Self::check_extent(sheet_name, store)?;

        let mut archive = XlsxReader::open_archive(source)?;
        let sheets = XlsxReader::read_workbook_xml(&mut archive)?;
        let sheet_paths = XlsxReader::read_workbook_rels(&mut archive)?;
        let mut workbook_rels = read_part(&mut archive, WORKBOOK_RELS)?;
        let mut content_types = read_part(&mut archive, CONTENT_TYPES)?;

        let mut replacements: HashMap<String, Vec<u8>> = HashMap::new();
        let mut appended: Option<(String, Vec<u8>)> = None;
        let sheet_xml = Self::worksheet_xml(store).into_bytes();

        let wanted = sheet_name.to_lowercase();
        let existing = sheets
            .iter()
            .find(|(name, _)| name.to_lowercase() == wanted);

        let mut rels_insert = None;
        let mut types_insert = None;

        match existing {
            Some((name, r_id)) => {
                let part = sheet_paths.get(r_id).ok_or_else(|| {
                    XlsxError::MissingPart(format!("worksheet for sheet \"{}\" ({})", name, r_id))
                })?;
                log::debug!("replacing sheet \"{}\" in part {}", name, part);
                replacements.insert(part.clone(), sheet_xml);
            }
            None => {
                validate_sheet_name(sheet_name)?;
                let workbook = read_part(&mut archive, WORKBOOK)?;

                let part_names: HashSet<&str> = archive.file_names().collect();
                let part = (sheets.len() + 1..)
                    .map(|n| format!("xl/worksheets/sheet{}.xml", n))
                    .find(|name| !part_names.contains(name.as_str()))
                    .ok_or_else(|| XlsxError::InvalidFormat("no free worksheet part".into()))?;

                let rel_ids: HashSet<String> =
                    attribute_values(&workbook_rels, b"Relationship", b"Id")?
                        .into_iter()
                        .collect();
                let r_id = (1..)
                    .map(|n| format!("rId{}", n))
                    .find(|id| !rel_ids.contains(id))
                    .ok_or_else(|| XlsxError::InvalidFormat("no free relationship id".into()))?;

                let sheet_id = attribute_values(&workbook, b"sheet", b"sheetId")?
                    .iter()
                    .filter_map(|id| id.parse::<u32>().ok())
                    .max()
                    .unwrap_or(0)
                    + 1;

                log::debug!(
                    "appending sheet \"{}\" as {} ({}, sheetId {})",
                    sheet_name,
                    part,
                    r_id,
                    sheet_id
                );

                let sheet_insert = Insert {
                    parent: b"sheets",
                    element: "sheet",
                    attributes: vec![
                        ("name".into(), sheet_name.to_string()),
                        ("sheetId".into(), sheet_id.to_string()),
                        (relationship_id_key(&workbook)?, r_id.clone()),
                    ],
                };
                let workbook = rewrite_xml(&workbook, &|_| false, Some(&sheet_insert))?;
                replacements.insert(WORKBOOK.to_string(), workbook);

                let target = part.strip_prefix("xl/").unwrap_or(&part).to_string();
                rels_insert = Some(Insert {
                    parent: b"Relationships",
                    element: "Relationship",
                    attributes: vec![
                        ("Id".into(), r_id),
                        ("Type".into(), WORKSHEET_REL_TYPE.into()),
                        ("Target".into(), target),
                    ],
                });
                types_insert = Some(Insert {
                    parent: b"Types",
                    element: "Override",
                    attributes: vec![
                        ("PartName".into(), format!("/{}", part)),
                        ("ContentType".into(), WORKSHEET_CONTENT_TYPE.into()),
                    ],
                });
                appended = Some((part, sheet_xml));
            }
        }

        let calc_chain = find_calc_chain(&workbook_rels)?;
        if rels_insert.is_some() || calc_chain.is_some() {
            workbook_rels = rewrite_xml(
                &workbook_rels,
                &|e| {
                    e.local_name().as_ref() == b"Relationship"
                        && attr(e, b"Type").is_some_and(|t| t.ends_with("/calcChain"))
                },
                rels_insert.as_ref(),
            )?;
            replacements.insert(WORKBOOK_RELS.to_string(), workbook_rels);
        }
        if types_insert.is_some() || calc_chain.is_some() {
            let calc_part_name = calc_chain.as_ref().map(|part| format!("/{}", part));
            content_types = rewrite_xml(
                &content_types,
                &|e| {
                    e.local_name().as_ref() == b"Override"
                        && match (&calc_part_name, attr(e, b"PartName")) {
                            (Some(calc), Some(name)) => name.eq_ignore_ascii_case(calc),
                            _ => false,
                        }
                },
                types_insert.as_ref(),
            )?;
            replacements.insert(CONTENT_TYPES.to_string(), content_types);
        }

        let mut zip = zip::ZipWriter::new(writer);
        let options = zip::write::SimpleFileOptions::default();

        for i in 0..archive.len() {
            let file = archive.by_index_raw(i)?;
            let name = file.name().to_string();
            if calc_chain.as_deref() == Some(name.as_str()) {
                continue;
            }
            match replacements.remove(&name) {
                Some(bytes) => {
                    zip.start_file(name, options)?;
                    zip.write_all(&bytes)?;
                }
                None => zip.raw_copy_file(file)?,
            }
        }

        if let Some((part, bytes)) = appended {
            zip.start_file(part, options)?;
            zip.write_all(&bytes)?;
        }

        if let Some(missing) = replacements.keys().next() {
            return Err(XlsxError::MissingPart(missing.clone()));
        }

        zip.finish()?;
        Ok(())
    }
}

fn read_part<R: Read + Seek>(archive: &mut zip::ZipArchive<R>, name: &str) -> XlsxResult<Vec<u8>> {
    let mut file = archive
        .by_name(name)
        .map_err(|_| XlsxError::MissingPart(name.to_string()))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Unescaped value of the attribute whose qualified name is `key`
fn attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Values of `key` on every `element` in `xml`
fn attribute_values(xml: &[u8], element: &[u8], key: &[u8]) -> XlsxResult<Vec<String>> {
    let mut reader = Reader::from_reader(xml);
    let mut values = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == element => {
                values.extend(attr(&e, key));
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(values)
}

/// Qualified name the workbook uses for a sheet's relationship id, `r:id`
/// unless its existing sheets say otherwise
fn relationship_id_key(workbook: &[u8]) -> XlsxResult<String> {
    let mut reader = Reader::from_reader(workbook);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sheet" => {
                let key = e.attributes().flatten().find_map(|a| {
                    (a.key.prefix().is_some() && a.key.local_name().as_ref() == b"id")
                        .then(|| String::from_utf8_lossy(a.key.as_ref()).into_owned())
                });
                if let Some(key) = key {
                    return Ok(key);
                }
            }
            Event::Eof => return Ok("r:id".to_string()),
            _ => {}
        }
    }
}

/// Package path of the calculation chain, if the workbook has one
fn find_calc_chain(workbook_rels: &[u8]) -> XlsxResult<Option<String>> {
    let mut reader = Reader::from_reader(workbook_rels);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e)
                if e.local_name().as_ref() == b"Relationship"
                    && attr(&e, b"Type").is_some_and(|t| t.ends_with("/calcChain")) =>
            {
                return Ok(attr(&e, b"Target").map(|target| match target.strip_prefix('/') {
                    Some(absolute) => absolute.to_string(),
                    None => format!("xl/{}", target),
                }));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// Copy `xml` through, leaving out every element `drop` matches and
/// appending `insert` to its parent
fn rewrite_xml(
    xml: &[u8],
    drop: &dyn Fn(&BytesStart) -> bool,
    insert: Option<&Insert>,
) -> XlsxResult<Vec<u8>> {
    let mut reader = Reader::from_reader(xml);
    let mut writer = Writer::new(Vec::with_capacity(xml.len() + 256));
    let mut skipping = 0usize;
    let is_parent = |name: &[u8]| insert.is_some_and(|i| i.parent == name);

    loop {
        let event = reader.read_event()?;
        if skipping > 0 {
            match event {
                Event::Start(_) => skipping += 1,
                Event::End(_) => skipping -= 1,
                Event::Eof => break,
                _ => {}
            }
            continue;
        }

        match event {
            Event::Eof => break,
            Event::Start(e) if drop(&e) => skipping = 1,
            Event::Empty(e) if drop(&e) => {}
            Event::Empty(e) if is_parent(e.local_name().as_ref()) => {
                let prefix = element_prefix(e.name().as_ref());
                writer.write_event(Event::Start(e.clone()))?;
                write_insert(&mut writer, &prefix, insert)?;
                writer.write_event(Event::End(e.to_end()))?;
            }
            Event::End(e) if is_parent(e.local_name().as_ref()) => {
                let prefix = element_prefix(e.name().as_ref());
                write_insert(&mut writer, &prefix, insert)?;
                writer.write_event(Event::End(e))?;
            }
            other => writer.write_event(other)?,
        }
    }

    Ok(writer.into_inner())
}

/// `x:` for `x:sheets`, empty for `sheets`
fn element_prefix(qualified: &[u8]) -> String {
    let qualified = String::from_utf8_lossy(qualified);
    match qualified.split_once(':') {
        Some((prefix, _)) => format!("{}:", prefix),
        None => String::new(),
    }
}

fn write_insert(writer: &mut Writer<Vec<u8>>, prefix: &str, insert: Option<&Insert>) -> XlsxResult<()> {
    let Some(insert) = insert else {
        return Ok(());
    };
    let mut element = format!("<{}{}", prefix, insert.element);
    for (key, value) in &insert.attributes {
        element.push_str(&format!(" {}=\"{}\"", key, escape_xml(value)));
    }
    element.push_str("/>");
    writer.get_mut().write_all(element.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rewrite_appends_to_parent() {
        let xml = br#"<Types xmlns="ct"><Default Extension="xml"/></Types>"#;
        let insert = Insert {
            parent: b"Types",
            element: "Override",
            attributes: vec![("PartName".into(), "/a&b.xml".into())],
        };
        let out = rewrite_xml(xml, &|_| false, Some(&insert)).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            r#"<Types xmlns="ct"><Default Extension="xml"/><Override PartName="/a&amp;b.xml"/></Types>"#
        );
    }

    #[test]
    fn test_rewrite_expands_empty_parent_and_keeps_prefix() {
        let xml = br#"<x:workbook xmlns:x="main"><x:sheets/></x:workbook>"#;
        let insert = Insert {
            parent: b"sheets",
            element: "sheet",
            attributes: vec![("name".into(), "S".into())],
        };
        let out = rewrite_xml(xml, &|_| false, Some(&insert)).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            r#"<x:workbook xmlns:x="main"><x:sheets><x:sheet name="S"/></x:sheets></x:workbook>"#
        );
    }

    #[test]
    fn test_rewrite_drops_matching_elements() {
        let xml = br#"<R><A Id="1"/><A Id="2"><B/></A><A Id="3"/></R>"#;
        let out = rewrite_xml(
            xml,
            &|e| attr(e, b"Id").as_deref() == Some("2"),
            None,
        )
        .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), r#"<R><A Id="1"/><A Id="3"/></R>"#);
    }

    #[test]
    fn test_find_calc_chain() {
        let rels = br#"<Relationships><Relationship Id="rId1" Type="http://x/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId9" Type="http://x/calcChain" Target="calcChain.xml"/></Relationships>"#;
        assert_eq!(find_calc_chain(rels).unwrap().as_deref(), Some("xl/calcChain.xml"));
        assert_eq!(find_calc_chain(b"<Relationships/>").unwrap(), None);
    }

    #[test]
    fn test_relationship_id_key_follows_workbook() {
        let workbook = br#"<workbook xmlns:rel="r"><sheets><sheet name="A" sheetId="1" rel:id="rId1"/></sheets></workbook>"#;
        assert_eq!(relationship_id_key(workbook).unwrap(), "rel:id");
    }
}

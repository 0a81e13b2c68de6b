//! Regex patterns for Romanian electricity invoice extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Page boundaries inserted by text acquisition
    pub static ref PAGE_BREAK: Regex = Regex::new(
        r"(?i)---\s*PAGE\s*BREAK\s*---"
    ).unwrap();

    // Generic dates
    pub static ref DATE_DMY: Regex = Regex::new(
        r"\b(\d{1,2})[./\-](\d{1,2})[./\-](\d{4}|\d{2})\b"
    ).unwrap();

    pub static ref DATE_YMD: Regex = Regex::new(
        r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b"
    ).unwrap();

    // Numbers
    pub static ref NUMERIC_PREFIX: Regex = Regex::new(
        r"^-?(?:\d+(?:\.\d*)?|\.\d+)"
    ).unwrap();

    pub static ref DIGITS: Regex = Regex::new(r"\d+").unwrap();

    // Client names
    pub static ref CLIENT_BEFORE_LABEL: Regex = Regex::new(
        r"(?i)CLIENT\s+([A-Z][A-Z\s.\-]+?)\s+(?:Adresa|Cod|CUI|CIF)"
    ).unwrap();

    pub static ref CLIENT_UPPERCASE: Regex = Regex::new(
        r"(?i)CLIENT\s+([A-Z][A-Z\s.\-]{3,50})"
    ).unwrap();

    pub static ref CLIENT_CONSUMER: Regex = Regex::new(
        r"(?i)(?:consumator|beneficiar)[\s:]*([A-Z][A-Z\s.\-]+)"
    ).unwrap();

    pub static ref CLIENT_NAMED: Regex = Regex::new(
        r"(?i)(?:nume|denumire)[\s:]*([A-Z][A-Z\s.\-]+)"
    ).unwrap();

    pub static ref CLIENT_NAME_SHAPE: Regex = Regex::new(
        r"^[A-Z\s.\-]+$"
    ).unwrap();

    pub static ref CLIENT_NAME_EXCLUDED: Regex = Regex::new(
        r"(?i)^(?:NON)?CASNIC$|^PIATA|^FACTURA|^PLATA|^ANTERIOR|^CURENT|^CONCURENTIAL|^NONCASNIC|^FURNIZOR|^DISTRIBUITOR"
    ).unwrap();
}

lazy_static! {
    // ELECTRICA invoice number
    pub static ref ELECTRICA_SERIE_NR: Regex = Regex::new(
        r"(?i)Serie[\s/]+Nr\.?[\s:]*([A-Z0-9/\-]{5,})"
    ).unwrap();

    pub static ref ELECTRICA_INVOICE_ID: Regex = Regex::new(
        r"(?i)ID\s+factur[aă][\s:]*([A-Z0-9/\-]{5,})"
    ).unwrap();

    pub static ref ELECTRICA_NR_FACTURA: Regex = Regex::new(
        r"(?i)nr\.?\s*factur[aă][\s:]*([A-Z0-9\-/]{5,})"
    ).unwrap();

    pub static ref ELECTRICA_FACTURA_NR: Regex = Regex::new(
        r"(?i)factura\s+nr\.?[\s:]*([A-Z0-9\-/]{5,})"
    ).unwrap();

    pub static ref ELECTRICA_SERIA_NR: Regex = Regex::new(
        r"(?i)seria\s+([A-Z]+)\s+nr\.?\s*(\d+)"
    ).unwrap();

    // ELECTRICA issue date
    pub static ref ELECTRICA_ISSUE_DATE_DOT: Regex = Regex::new(
        r"(?i)(?:data\s+emiterii|data\s+emitere|emis[aă]|dat[aă])[\s:]*(\d{1,2})\.(\d{1,2})\.(\d{4})"
    ).unwrap();

    pub static ref ELECTRICA_ISSUE_DATE_DASH: Regex = Regex::new(
        r"(?i)(?:data\s+emiterii|data\s+emitere|emis[aă]|dat[aă])[\s:]*(\d{1,2})-(\d{1,2})-(\d{4})"
    ).unwrap();

    pub static ref ELECTRICA_ISSUE_DATE_ISO: Regex = Regex::new(
        r"(?i)(?:data\s+emiterii|data\s+emitere|emis[aă]|dat[aă])[\s:]*(\d{4})-(\d{2})-(\d{2})"
    ).unwrap();

    pub static ref ELECTRICA_DATE_AFTER_SERIE: Regex = Regex::new(
        r"(?is)Serie[\s/]+Nr\.?[\s:]*[A-Z0-9/\-]{5,}.{0,200}?(\d{1,2})\.(\d{1,2})\.(\d{4})"
    ).unwrap();

    // ELECTRICA site codes (NLC)
    pub static ref NLC_LABELED: Regex = Regex::new(
        r"(?i)NLC[\s:)*\]]+([0-9]{10,12})"
    ).unwrap();

    pub static ref NLC_PARENTHESIZED: Regex = Regex::new(
        r"(?i)\(NLC\)[\s:]*([0-9]{10,12})"
    ).unwrap();

    pub static ref NLC_COD_LOC_CONSUM: Regex = Regex::new(
        r"(?i)cod\s+loc\s+consum[\s:()NLC]*([0-9]{10,12})"
    ).unwrap();

    pub static ref NLC_LOC_DE_CONSUM: Regex = Regex::new(
        r"(?i)loc\s+de\s+consum[\s:()NLC]*([0-9]{10,12})"
    ).unwrap();

    // ELECTRICA site name
    pub static ref ELECTRICA_SITE_DETAILS: Regex = Regex::new(
        r"(?i)DETALII\s+LOC\s+DE\s+CONSUM\s*[–\-]\s*([^–\-]+?)\s*[–\-]\s*energie"
    ).unwrap();

    pub static ref ELECTRICA_SITE_LOCALITY: Regex = Regex::new(
        r"(?i)Localitatea\s+([A-Z][A-Za-z\s]+),\s*Comuna\s+([A-Z][A-Za-z\s]+)"
    ).unwrap();

    pub static ref ELECTRICA_SITE_LOCATION: Regex = Regex::new(
        r"(?i)(?:locație|locatie|punct\s+de\s+consum)[\s:]*([^\n]{10,150})"
    ).unwrap();

    // ELECTRICA metering point (POD)
    pub static ref ELECTRICA_POD: Regex = Regex::new(
        r"(?i)POD[\s:]*([0-9]{15,20})"
    ).unwrap();

    pub static ref ELECTRICA_POD_MEASUREMENT: Regex = Regex::new(
        r"(?i)cod\s+punct\s+m[aă]sur[aă][\s:]*([0-9]{15,20})"
    ).unwrap();

    pub static ref ELECTRICA_POD_NATIONAL: Regex = Regex::new(
        r"(RO[0-9E]{10,20})"
    ).unwrap();
}

lazy_static! {
    // ELECTRICA addresses
    pub static ref ELECTRICA_SITE_ADDRESS: Regex = Regex::new(
        r"(?is)Adres[aă]\s+loc\s+de\s+consum[\s:]*(.*?)(?:Denumirea|Contract|COD\s+Loc|$)"
    ).unwrap();

    pub static ref CORRESPONDENCE_ADDRESS: Regex = Regex::new(
        r"(?i)Adresa\s+de\s+coresponden[tț][aă][\s:]*([^\n]{20,200})"
    ).unwrap();

    pub static ref HEADQUARTERS_ADDRESS: Regex = Regex::new(
        r"(?i)Adres[aă]\s+sediu[\s:]*([^\n]{20,200})"
    ).unwrap();

    pub static ref CLIENT_BLOCK_ADDRESS: Regex = Regex::new(
        r"(?is)CLIENT.{0,100}?Adres[aă][\s:]*([^\n]{20,200})"
    ).unwrap();

    pub static ref LOCALITY_ADDRESS: Regex = Regex::new(
        r"(?i)Localitatea\s+([^\n]{20,200}?)(?:Denumirea|Contract|COD)"
    ).unwrap();

    pub static ref STREET_ADDRESS: Regex = Regex::new(
        r"(?i)(?:str\.|strada|bd\.|bulevardul)\s*([^\n]{10,150})"
    ).unwrap();

    pub static ref POSTAL_CODE_SUFFIX: Regex = Regex::new(
        r"(?i),?\s*cod\s*po[sș]tal\s*\d*"
    ).unwrap();

    pub static ref TRAILING_COMMA: Regex = Regex::new(r",\s*$").unwrap();

    pub static ref TRAILING_SIX_DIGITS: Regex = Regex::new(r"\s+\d{6}$").unwrap();
}

lazy_static! {
    // ELECTRICA consumption
    pub static ref ELECTRICA_TOTAL_SITE_KWH: Regex = Regex::new(
        r"(?i)Total\s+loc\s+de\s+consum[\s:]*(-?[0-9,.]+)\s*kWh"
    ).unwrap();

    pub static ref ELECTRICA_TOTAL_ACTIVE_KWH: Regex = Regex::new(
        r"(?i)Total\s+energie\s+activ[aă][\s:]*(-?[0-9,.]+)\s*kWh"
    ).unwrap();

    pub static ref ELECTRICA_ACTIVE_KWH: Regex = Regex::new(
        r"(?i)energie\s+activ[aă][\s:]*(-?[0-9,.]+)\s*kWh"
    ).unwrap();

    pub static ref ELECTRICA_BILLED_KWH: Regex = Regex::new(
        r"(?i)Cantitate\s+facturat[aă][\s:]*(-?[0-9,.]+)\s*kWh"
    ).unwrap();

    pub static ref ELECTRICA_CONSUMPTION_KWH: Regex = Regex::new(
        r"(?i)(?:consum|cantitate)[\s:]*(-?[0-9,.]+)\s*kWh"
    ).unwrap();

    // ELECTRICA total payment
    pub static ref ELECTRICA_TOTAL_LEI: Regex = Regex::new(
        r"(?i)Total\s+de\s+plat[aă][\s:]*(-?[0-9.,]+)\s*lei"
    ).unwrap();

    pub static ref ELECTRICA_TOTAL_AFTER_BALANCE: Regex = Regex::new(
        r"(?is)SOLD\s+ANTERIOR.{0,200}?TOTAL\s+DE\s+PLAT[AĂ].{0,50}?(-?[0-9]+[.,][0-9]{2})"
    ).unwrap();

    pub static ref ELECTRICA_TOTAL_LEI_HEADER: Regex = Regex::new(
        r"(?i)TOTAL\s+DE\s+PLAT[AĂ]\s*\(LEI\)[\s:]*(-?[0-9.,]+)"
    ).unwrap();

    pub static ref ELECTRICA_TOTAL: Regex = Regex::new(
        r"(?i)TOTAL\s+DE\s+PLAT[AĂ][\s:]*(-?[0-9.,]+)"
    ).unwrap();

    // ELECTRICA billing period
    pub static ref ELECTRICA_PERIOD_LABELED: Regex = Regex::new(
        r"(?i)Perioad[aă]\s+de\s+facturare[\s:]*(\d{1,2})\.(\d{1,2})\.(\d{4})[\s\-–]+(\d{1,2})\.(\d{1,2})\.(\d{4})"
    ).unwrap();

    pub static ref ELECTRICA_PERIOD_SHORT_LABEL: Regex = Regex::new(
        r"(?i)Period[aă]\s+de\s+facturare[\s:]*(\d{1,2})\.(\d{1,2})\.(\d{4})[\s\-–]+(\d{1,2})\.(\d{1,2})\.(\d{4})"
    ).unwrap();

    pub static ref ELECTRICA_PERIOD_BILLING: Regex = Regex::new(
        r"(?i)facturare[\s:]*(\d{1,2})\.(\d{1,2})\.(\d{4})[\s\-–]+(\d{1,2})\.(\d{1,2})\.(\d{4})"
    ).unwrap();

    pub static ref DATE_RANGE: Regex = Regex::new(
        r"(\d{1,2})\.(\d{1,2})\.(\d{4})\s*[\-–]\s*(\d{1,2})\.(\d{1,2})\.(\d{4})"
    ).unwrap();

    // ELECTRICA section headers
    pub static ref ELECTRICA_SECTION_HEADER: Regex = Regex::new(
        r"(?i)DETALII\s+LOC\s+DE\s+CONSUM"
    ).unwrap();
}

lazy_static! {
    // PPC invoice number and issue date
    pub static ref PPC_SERIA_NR: Regex = Regex::new(
        r"(?i)seria\s+([A-Z0-9]+)\s+nr\s+([0-9]+)"
    ).unwrap();

    pub static ref PPC_ISSUED_ON: Regex = Regex::new(
        r"(?i)din\s+data\s+de\s+(\d{1,2})\.(\d{1,2})\.(\d{4})"
    ).unwrap();

    pub static ref PPC_INVOICE_DATE: Regex = Regex::new(
        r"(?i)data\s+facturii[\s:]+(\d{1,2})\.(\d{1,2})\.(\d{4})"
    ).unwrap();

    // PPC client names
    pub static ref PPC_CLIENT_BEFORE_LABEL: Regex = Regex::new(
        r"(?i)CLIENT\s+([A-Z][A-Z\s.\-]+?)\s+(?:Adresa|Adres[aă]|Cod|CUI|CIF)"
    ).unwrap();

    pub static ref PPC_COMMUNE: Regex = Regex::new(
        r"(?i)(COMUNA\s+[A-Z]+)"
    ).unwrap();

    pub static ref PPC_TOWN_HALL: Regex = Regex::new(
        r"(?i)(PRIMARIA\s+[A-Z]+)"
    ).unwrap();

    pub static ref PPC_NAME_AFTER_CORRESPONDENCE: Regex = Regex::new(
        r"(?i)Adres[aă]\s+de\s+coresponden[tț][aă]\s*[\n\r]+\s*([A-Z][A-Z\s.\-]{3,50})"
    ).unwrap();

    pub static ref PPC_NAME_BEFORE_CORRESPONDENCE: Regex = Regex::new(
        r"(?i)([A-Z][A-Z\s.\-]{5,50})\s*[\n\r]+\s*Adres[aă]\s+de\s+coresponden"
    ).unwrap();

    // PPC site codes (ELECTEL)
    pub static ref ELECTEL_LABELED: Regex = Regex::new(
        r"(?i)Cod\s+ELECTEL[\s:,]+(\d{9})"
    ).unwrap();

    pub static ref ELECTEL_FROM_POD: Regex = Regex::new(
        r"(?i)POD[\s:,]+RO\d{3}E(\d{9})"
    ).unwrap();

    // PPC metering point (POD)
    pub static ref PPC_POD: Regex = Regex::new(
        r"(?i)POD[\s:]+([A-Z0-9]{15,25})"
    ).unwrap();

    pub static ref PPC_POD_NATIONAL: Regex = Regex::new(
        r"(?i)(RO[0-9]{3}E[0-9]{9,15})"
    ).unwrap();
}

lazy_static! {
    // PPC site names
    pub static ref PPC_SITE_BEFORE_ADDRESS: Regex = Regex::new(
        r"(?im)^([A-Z][A-Z0-9\s.\-]{2,60}?)(?:-\d+[/\d.]*)?[\s\r\n]+Adres[aă]\s+loc\s+consum"
    ).unwrap();

    pub static ref PPC_SITE_FIRST_LINE: Regex = Regex::new(
        r"(?m)^([A-Z][A-Z0-9\s.\-]{2,60}?)[\r\n]"
    ).unwrap();

    pub static ref PPC_SITE_WITH_REFERENCE: Regex = Regex::new(
        r"(?m)^([A-Z][A-Z0-9\s]{3,60})-\d+"
    ).unwrap();

    pub static ref PPC_SITE_BEFORE_CODE: Regex = Regex::new(
        r"(?im)^([A-Z][A-Z0-9\s.\-]{2,60}?)[\s\r\n]+(?:Adres|Cod\s+ELECTEL)"
    ).unwrap();

    pub static ref SITE_REFERENCE_SUFFIX: Regex = Regex::new(r"-\d+.*$").unwrap();

    pub static ref PPC_SITE_NOT_A_NAME: Regex = Regex::new(
        r"(?i)^(?:Adres|Cod\s|Nivel|Oferta|Pagina|Interval|Specificat)"
    ).unwrap();
}

lazy_static! {
    // PPC addresses
    pub static ref PPC_SITE_ADDRESS_COLON: Regex = Regex::new(
        r"(?i)Adres[aă]\s+loc\s+consum\s*:\s*([^\n]{10,200})"
    ).unwrap();

    pub static ref PPC_SITE_ADDRESS_STREET: Regex = Regex::new(
        r"(?i)Adres[aă]\s+loc\s+consum\s+((?:Strada|Str\.|Calea|Bd\.|Bulevardul|Aleea|Piata|Pia[tț]a)[^\n]{10,200})"
    ).unwrap();

    pub static ref PPC_SITE_ADDRESS_TEXT: Regex = Regex::new(
        r"(?i)Adres[aă]\s+loc\s+consum\s+([A-Z][^\n]{10,200})"
    ).unwrap();

    pub static ref PPC_SITE_ADDRESS_LINE: Regex = Regex::new(
        r"(?i)\n\s*Adres[aă]\s+loc\s+consum\s+([^\n]{10,200})"
    ).unwrap();

    pub static ref PPC_HEADQUARTERS_ADDRESS: Regex = Regex::new(
        r"(?i)Adres[aă]\s+sediu\s+social\s*:\s*([^\n]{10,200})"
    ).unwrap();

    pub static ref PPC_CORRESPONDENCE_ADDRESS: Regex = Regex::new(
        r"(?i)Adres[aă]\s+de\s+coresponden[tț][aă]\s*:\s*([^\n]{10,200})"
    ).unwrap();

    pub static ref ONLY_DIGITS: Regex = Regex::new(r"^\d+$").unwrap();

    pub static ref CODE_LIKE: Regex = Regex::new(r"^[A-Z]{2,3}\d").unwrap();
}

lazy_static! {
    // PPC consumption table
    pub static ref PPC_CONSUMPTION_ROW: Regex = Regex::new(
        r"(?i)Energie\s+activ\s*[aă]\s+(\d{1,2})\.(\d{1,2})\.(\d{2,4})\s*-\s*(\d{1,2})\.(\d{1,2})\.(\d{2,4})\s+kWh\s+(\d+)([^\n]*)"
    ).unwrap();

    pub static ref REGULATORY_CONTEXT: Regex = Regex::new(
        r"(?i)OUG|cf\."
    ).unwrap();

    pub static ref ROW_ORDINAL: Regex = Regex::new(
        r"\d+\.\s*$"
    ).unwrap();

    pub static ref METER_READING_TYPE: Regex = Regex::new(
        r"(?i)(?:cit|citit|estimat|convenie|autocitit)[^\d]*(\d+)"
    ).unwrap();

    pub static ref PPC_ACTIVE_CONSUMPTION: Regex = Regex::new(
        r"(?i)Consum\s+energie\s+activ[aă][^\n]*?(\d+)"
    ).unwrap();

    pub static ref PPC_TOTAL_ENERGY: Regex = Regex::new(
        r"(?is)Total\s+energie.*?(-?[0-9.,]+)\s*kWh"
    ).unwrap();

    // PPC total payment
    pub static ref PPC_TOTAL_AFTER_FORMULA: Regex = Regex::new(
        r"(?is)Total\s+de\s+plat[aă]\s*\([^)]+\).*?(-?[0-9]+(?:\.[0-9]{3})*[.,][0-9]{2})"
    ).unwrap();

    pub static ref PPC_TOTAL_NUMBERED: Regex = Regex::new(
        r"(?is)6\.\s*Total\s+de\s+plat[aă].*?(-?[0-9]+(?:\.[0-9]{3})*[.,][0-9]{2})"
    ).unwrap();

    pub static ref PPC_TOTAL_LEI: Regex = Regex::new(
        r"(?is)Total\s+de\s+plat[aă].*?(-?[0-9][0-9.,]*)\s*lei"
    ).unwrap();

    pub static ref PPC_TOTAL: Regex = Regex::new(
        r"(?is)Total\s+de\s+plat[aă].*?(-?[0-9][0-9.,]*)"
    ).unwrap();

    // PPC billing period
    pub static ref PPC_PERIOD: Regex = Regex::new(
        r"(?i)Perioad[aă]\s+facturare[\s:]*(\d{1,2})\.(\d{1,2})\.(\d{4})\s*[\-–]\s*(\d{1,2})\.(\d{1,2})\.(\d{4})"
    ).unwrap();

    pub static ref PPC_PERIOD_DE: Regex = Regex::new(
        r"(?i)Perioad[aă]\s+de\s+facturare[\s:]*(\d{1,2})\.(\d{1,2})\.(\d{4})\s*[\-–]\s*(\d{1,2})\.(\d{1,2})\.(\d{4})"
    ).unwrap();

    // PPC section headers
    pub static ref PPC_LOCATION_HEADER: Regex = Regex::new(
        r"(?im)^([A-Z][A-Z0-9\s.\-]+)[\r\n]+Adres[aă]\s+loc\s+consum"
    ).unwrap();

    pub static ref PPC_ELECTEL_HEADER: Regex = Regex::new(
        r"(?i)Cod\s+ELECTEL"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_break_is_whitespace_tolerant() {
        assert!(PAGE_BREAK.is_match("---PAGE BREAK---"));
        assert!(PAGE_BREAK.is_match("--- page  break ---"));
    }

    #[test]
    fn test_nlc_patterns() {
        assert_eq!(&NLC_LABELED.captures("NLC: 1234567890").unwrap()[1], "1234567890");
        assert_eq!(
            &NLC_COD_LOC_CONSUM.captures("Cod loc consum (NLC) 123456789012").unwrap()[1],
            "123456789012"
        );
        assert!(NLC_LABELED.captures("NLC: 123456789").is_none());
    }

    #[test]
    fn test_electel_from_pod() {
        let caps = ELECTEL_FROM_POD.captures("POD: RO005E541393231").unwrap();
        assert_eq!(&caps[1], "541393231");
    }

    #[test]
    fn test_consumption_row_captures_constant_and_rest() {
        let row = "Energie activă 17.01.25-31.01.25 kWh 1 26222/cit 26270/cit 48 0 48";
        let caps = PPC_CONSUMPTION_ROW.captures(row).unwrap();
        assert_eq!(&caps[1], "17");
        assert_eq!(&caps[6], "25");
        assert_eq!(&caps[7], "1");
        assert_eq!(&caps[8], " 26222/cit 26270/cit 48 0 48");
    }

    #[test]
    fn test_section_headers() {
        assert!(ELECTRICA_SECTION_HEADER.is_match("DETALII LOC DE CONSUM – SCOALA"));
        assert!(PPC_LOCATION_HEADER.is_match("CAMIN CULTURAL\nAdresă loc consum: Strada BANIA"));
        assert!(!PPC_LOCATION_HEADER.is_match("CAMIN-137689441/16.09.2014\nAdresă loc consum: X"));
        assert!(PPC_ELECTEL_HEADER.is_match("Cod ELECTEL: 541393231"));
    }

    #[test]
    fn test_ppc_total_skips_formula_digits() {
        let text = "Total de plată (6=4+5) 30.075,79 lei";
        let caps = PPC_TOTAL_AFTER_FORMULA.captures(text).unwrap();
        assert_eq!(&caps[1], "30.075,79");
    }
}

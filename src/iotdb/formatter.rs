use crate::format::{SqlLayout, layout, or_original};
use crate::{FormatOptions, Language};

use super::lexicon::LEXICON;

pub static LAYOUT: SqlLayout = SqlLayout {
    lexicon: &LEXICON,
    major: &[
        "SELECT", "FROM", "INSERT", "CREATE", "DROP", "DELETE", "SHOW", "SET", "UNSET", "ALTER",
        "GRANT", "REVOKE", "COUNT", "FLUSH", "EXPLAIN", "LIST",
    ],
    clauses: &[
        "INTO", "WHERE", "GROUP BY", "ORDER BY", "HAVING", "FILL", "LIMIT", "OFFSET", "SLIMIT",
        "SOFFSET", "ALIGN BY DEVICE", "ALIGN BY TIME", "VALUES", "WITH",
    ],
    calls: &["FILL"],
};

pub fn format(text: &str, options: &FormatOptions) -> String {
    or_original(text, Language::IoTDBSQL, || layout(text, &LAYOUT, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn select_with_alignment() {
        let out = format(
            "select s1,s2 from root.sg1.d1 where time>2017-11-01T00:00:00 and s1>10 fill(previous) align by device",
            &FormatOptions::default(),
        );
        assert_eq!(
            out,
            "SELECT s1, s2\n\
             FROM root.sg1.d1\n\
             WHERE TIME > 2017-11-01T00:00:00 AND s1 > 10\n\
             FILL(previous)\n\
             ALIGN BY DEVICE"
        );
    }

    #[test]
    fn group_by_interval_keeps_the_half_open_range() {
        let out = format(
            "select count(s1) from root.sg1.d1 group by ([2017-11-01T00:00:00, 2017-11-07T23:00:00),1d)",
            &FormatOptions::default(),
        );
        assert_eq!(
            out,
            "SELECT count(s1)\n\
             FROM root.sg1.d1\n\
             GROUP BY ([2017-11-01T00:00:00, 2017-11-07T23:00:00), 1d)"
        );
    }

    #[test]
    fn insert_and_create() {
        let options = FormatOptions::default();
        assert_eq!(
            format("insert into root.sg1.d1(timestamp,s1) values(1,2)", &options),
            "INSERT INTO root.sg1.d1(timestamp, s1)\nVALUES (1, 2)"
        );
        assert_eq!(
            format("create timeseries root.sg1.d1.s1 with datatype=INT32,encoding=RLE", &options),
            "CREATE TIMESERIES root.sg1.d1.s1\nWITH DATATYPE = INT32, ENCODING = RLE"
        );
    }

    #[test]
    fn paths_are_never_split() {
        let out = format("select * from root.ln.wf01.wt01.**", &FormatOptions::default());
        assert_eq!(out, "SELECT *\nFROM root.ln.wf01.wt01.**");
    }

    #[test]
    fn broken_input_is_returned_unchanged() {
        let text = "select s1 from root.sg1.d1 where s2 = 'open";
        assert_eq!(format(text, &FormatOptions::default()), text);
    }

    #[rstest]
    #[case("SELECT * FROM root.sg1.d1")]
    #[case("select last_value(s1) from root.sg1.* group by level = 1 order by time desc limit 10 slimit 2")]
    #[case("insert into root.sg1.d1(timestamp, s1, s2) values (1, 2, 3), (2, 3, 4)")]
    #[case("show timeseries root.sg1.**; count devices -- all\n")]
    #[case("delete from root.sg1.d1.s1 where time < 2020-01-01T00:00:00")]
    fn idempotent(#[case] text: &str) {
        let options = FormatOptions::default();
        let once = format(text, &options);
        assert_eq!(format(&once, &options), once);
    }
}

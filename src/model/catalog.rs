//! OOPS! 缺陷目录
//!
//! OOPS! 服务公开目录中的缺陷代码与标准名称（P01–P41）。
//! 响应中只携带代码和描述，展示时用本目录补全标准名称。

/// 缺陷代码 → 标准名称
static PITFALL_CATALOG: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "P01" => "Creating polysemous elements",
    "P02" => "Creating synonyms as classes",
    "P03" => "Creating the relationship \"is\" instead of using \"rdfs:subClassOf\", \"rdf:type\" or \"owl:sameAs\"",
    "P04" => "Creating unconnected ontology elements",
    "P05" => "Defining wrong inverse relationships",
    "P06" => "Including cycles in a class hierarchy",
    "P07" => "Merging different concepts in the same class",
    "P08" => "Missing annotations",
    "P09" => "Missing domain information",
    "P10" => "Missing disjointness",
    "P11" => "Missing domain or range in properties",
    "P12" => "Equivalent properties not explicitly declared",
    "P13" => "Inverse relationships not explicitly declared",
    "P14" => "Misusing \"owl:allValuesFrom\"",
    "P15" => "Using \"some not\" in place of \"not some\"",
    "P16" => "Using a primitive class in place of a defined one",
    "P17" => "Overspecializing a hierarchy",
    "P18" => "Overspecializing the domain or range",
    "P19" => "Defining multiple domains or ranges in properties",
    "P20" => "Misusing ontology annotations",
    "P21" => "Using a miscellaneous class",
    "P22" => "Using different naming conventions in the ontology",
    "P23" => "Duplicating a datatype already provided by the implementation language",
    "P24" => "Using recursive definitions",
    "P25" => "Defining a relationship as inverse to itself",
    "P26" => "Defining inverse relationships for a symmetric relationship",
    "P27" => "Defining wrong equivalent relationships",
    "P28" => "Defining wrong symmetric relationships",
    "P29" => "Defining wrong transitive relationships",
    "P30" => "Equivalent classes not explicitly declared",
    "P31" => "Defining wrong equivalent classes",
    "P32" => "Several classes with the same label",
    "P33" => "Creating a property chain with just one property",
    "P34" => "Untyped class",
    "P35" => "Untyped property",
    "P36" => "URI contains file extension",
    "P37" => "Ontology not available on the Web",
    "P38" => "No OWL ontology declaration",
    "P39" => "Ambiguous namespace",
    "P40" => "Namespace hijacking",
    "P41" => "No license declared",
};

/// 查询缺陷代码的标准名称
pub fn canonical_name(code: &str) -> Option<&'static str> {
    PITFALL_CATALOG.get(code).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lookup() {
        assert_eq!(canonical_name("P04"), Some("Creating unconnected ontology elements"));
        assert_eq!(canonical_name("P41"), Some("No license declared"));
        assert_eq!(canonical_name("P42"), None);
        assert_eq!(canonical_name(""), None);
    }
}

//! Shared fixtures for the ingestion integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};

const PROLOGUE: &str = r#"<?xml version="1.0"?>
<!DOCTYPE rdf:RDF [
    <!ENTITY obo "http://purl.obolibrary.org/obo/" >
]>
<rdf:RDF xmlns="http://purl.obolibrary.org/obo/"
     xmlns:owl="http://www.w3.org/2002/07/owl#"
     xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
     xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
     xmlns:obo="http://purl.obolibrary.org/obo/"
     xmlns:oboInOwl="http://www.geneontology.org/formats/oboInOwl#">
"#;

/// Wrap class declarations in a document announcing `version`
pub fn ontology_document(ontology: &str, version: &str, body: &str) -> String {
    format!(
        "{PROLOGUE}    <owl:Ontology rdf:about=\"&obo;{ontology}.owl\">\n        \
         <owl:versionIRI rdf:resource=\"&obo;{ontology}/releases/{version}/{ontology}.owl\"/>\n    \
         </owl:Ontology>\n{body}</rdf:RDF>\n"
    )
}

fn class(id: &str, label: &str, extra: &str) -> String {
    format!(
        "    <owl:Class rdf:about=\"&obo;{id}\">\n        <rdfs:label>{label}</rdfs:label>\n{extra}    </owl:Class>\n"
    )
}

fn subclass(parent: &str) -> String {
    format!("        <rdfs:subClassOf rdf:resource=\"&obo;{parent}\"/>\n")
}

fn restriction(property: &str, filler: &str) -> String {
    format!(
        "        <rdfs:subClassOf>\n            <owl:Restriction>\n                \
         <owl:onProperty rdf:resource=\"&obo;{property}\"/>\n                \
         <owl:someValuesFrom rdf:resource=\"&obo;{filler}\"/>\n            \
         </owl:Restriction>\n        </rdfs:subClassOf>\n"
    )
}

fn namespace(namespace: &str) -> String {
    format!("        <oboInOwl:hasOBONamespace>{namespace}</oboInOwl:hasOBONamespace>\n")
}

const DEPRECATED: &str = "        <owl:deprecated rdf:datatype=\"http://www.w3.org/2001/XMLSchema#boolean\">true</owl:deprecated>\n";

/// A small Cell Ontology release
pub fn cl_document(version: &str) -> String {
    let body = [
        class("CL_0000000", "cell", ""),
        class("CL_0000540", "neuron", &format!("{}{}", subclass("CL_0000000"), restriction("BFO_0000050", "UBERON_0001016"))),
        class("CL_0000001", "obsolete primary cell", DEPRECATED),
    ]
    .concat();
    ontology_document("cl", version, &body)
}

/// Cell Ontology release with `count` sibling classes
pub fn large_cl_document(count: usize) -> String {
    let body: String = (0..count)
        .map(|i| class(&format!("CL_{:07}", 1000 + i), &format!("cell type {}", i), &subclass("CL_0000000")))
        .collect();
    ontology_document("cl", "2024-01-04", &body)
}

/// A Gene Ontology slice spanning all three subontologies
pub fn go_document(version: &str) -> String {
    let mf = namespace("molecular_function");
    let bp = namespace("biological_process");
    let cc = namespace("cellular_component");

    let body = [
        class("GO_0003674", "molecular_function", &mf),
        class("GO_0003824", "catalytic activity", &format!("{mf}{}", subclass("GO_0003674"))),
        class("GO_0016787", "hydrolase activity", &format!("{mf}{}", subclass("GO_0003824"))),
        class("GO_0000005", "obsolete ribosomal chaperone activity", &format!("{mf}{DEPRECATED}")),
        class("GO_0008150", "biological_process", &bp),
        class("GO_0007268", "chemical synaptic transmission", &format!("{bp}{}", subclass("GO_0008150"))),
        class("GO_0005575", "cellular_component", &cc),
        class("GO_0005622", "intracellular anatomical structure", &format!("{cc}{}", subclass("GO_0005575"))),
        class("GO_0043231", "intracellular membrane-bounded organelle", &format!("{cc}{}", subclass("GO_0005575"))),
        class(
            "GO_0005634",
            "nucleus",
            &format!("{cc}{}{}", subclass("GO_0043231"), restriction("BFO_0000050", "GO_0005622")),
        ),
    ]
    .concat();
    ontology_document("go", version, &body)
}

/// UBERON slice with cross-references
pub fn uberon_document() -> String {
    let xrefs = [
        "        <oboInOwl:hasDbXref>MESH:D006321</oboInOwl:hasDbXref>\n",
        "        <oboInOwl:hasDbXref>FMA:7088</oboInOwl:hasDbXref>\n",
        "        <oboInOwl:hasDbXref>0000001</oboInOwl:hasDbXref>\n",
    ]
    .concat();

    let body = [
        class("UBERON_0000062", "organ", ""),
        class("UBERON_0000948", "heart", &format!("{}{}{xrefs}", subclass("UBERON_0000062"), restriction("BFO_0000050", "UBERON_0004535"))),
        class("UBERON_0004535", "cardiovascular system", ""),
    ]
    .concat();
    ontology_document("uberon", "2024-01-18", &body)
}

pub fn write_document(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

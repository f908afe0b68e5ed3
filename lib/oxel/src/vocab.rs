//! OWL 2 vocabulary used by the loader and the model.

pub mod owl {
    //! The part of the [OWL 2](https://www.w3.org/TR/owl2-mapping-to-rdf/) vocabulary
    //! the RDF mapping of the EL profile relies on, plus the terms the loader
    //! recognizes in order to report them as unsupported.
    use oxrdf::NamedNodeRef;

    // === CLASSES ===
    /// [The class of all classes](https://www.w3.org/TR/owl2-syntax/#Classes)
    pub const CLASS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Class");
    /// [The class containing every individual](https://www.w3.org/TR/owl2-syntax/#Class_Expressions)
    pub const THING: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Thing");
    /// [The empty class](https://www.w3.org/TR/owl2-syntax/#Class_Expressions)
    pub const NOTHING: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Nothing");
    /// [The class of named individuals](https://www.w3.org/TR/owl2-syntax/#Individuals)
    pub const NAMED_INDIVIDUAL: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#NamedIndividual");
    /// [The class of ontologies](https://www.w3.org/TR/owl2-syntax/#Ontologies)
    pub const ONTOLOGY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Ontology");
    /// [The class of property restrictions](https://www.w3.org/TR/owl2-mapping-to-rdf/#Parsing_of_Expressions)
    pub const RESTRICTION: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Restriction");
    /// [Disjointness of several classes](https://www.w3.org/TR/owl2-syntax/#Disjoint_Classes)
    pub const ALL_DISJOINT_CLASSES: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#AllDisjointClasses");

    // === PROPERTY TYPES ===
    /// [The class of object properties](https://www.w3.org/TR/owl2-syntax/#Object_Properties)
    pub const OBJECT_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#ObjectProperty");
    /// [The class of datatype properties](https://www.w3.org/TR/owl2-syntax/#Data_Properties)
    pub const DATATYPE_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#DatatypeProperty");
    /// [The class of annotation properties](https://www.w3.org/TR/owl2-syntax/#Annotation_Properties)
    pub const ANNOTATION_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#AnnotationProperty");
    /// [The class of transitive properties](https://www.w3.org/TR/owl2-syntax/#Transitive_Object_Properties)
    pub const TRANSITIVE_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#TransitiveProperty");
    /// [The class of reflexive properties](https://www.w3.org/TR/owl2-syntax/#Reflexive_Object_Properties)
    pub const REFLEXIVE_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#ReflexiveProperty");

    // === CLASS AXIOMS ===
    /// [Class equivalence](https://www.w3.org/TR/owl2-syntax/#Equivalent_Classes)
    pub const EQUIVALENT_CLASS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#equivalentClass");
    /// [Disjointness of two classes](https://www.w3.org/TR/owl2-syntax/#Disjoint_Classes)
    pub const DISJOINT_WITH: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#disjointWith");
    /// Members of an `owl:AllDisjointClasses` axiom
    pub const MEMBERS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#members");

    // === PROPERTY AXIOMS ===
    /// [Property equivalence](https://www.w3.org/TR/owl2-syntax/#Equivalent_Object_Properties)
    pub const EQUIVALENT_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#equivalentProperty");
    /// [Property chain inclusion](https://www.w3.org/TR/owl2-syntax/#Object_Subproperties)
    pub const PROPERTY_CHAIN_AXIOM: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#propertyChainAxiom");
    /// [Inverse properties](https://www.w3.org/TR/owl2-syntax/#Inverse_Object_Properties_2), outside of EL
    pub const INVERSE_OF: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#inverseOf");

    // === CLASS EXPRESSIONS ===
    /// [Intersection](https://www.w3.org/TR/owl2-syntax/#Intersection_of_Class_Expressions)
    pub const INTERSECTION_OF: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#intersectionOf");
    /// [Union](https://www.w3.org/TR/owl2-syntax/#Union_of_Class_Expressions), outside of EL
    pub const UNION_OF: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#unionOf");
    /// [Complement](https://www.w3.org/TR/owl2-syntax/#Complement_of_Class_Expressions), outside of EL
    pub const COMPLEMENT_OF: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#complementOf");
    /// [Enumeration of individuals](https://www.w3.org/TR/owl2-syntax/#Enumeration_of_Individuals)
    pub const ONE_OF: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#oneOf");
    /// The property a restriction is about
    pub const ON_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#onProperty");
    /// [Existential quantification](https://www.w3.org/TR/owl2-syntax/#Existential_Quantification)
    pub const SOME_VALUES_FROM: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#someValuesFrom");
    /// [Individual value restriction](https://www.w3.org/TR/owl2-syntax/#Individual_Value_Restriction)
    pub const HAS_VALUE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#hasValue");
    /// [Universal quantification](https://www.w3.org/TR/owl2-syntax/#Universal_Quantification), outside of EL
    pub const ALL_VALUES_FROM: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#allValuesFrom");
    /// [Exact cardinality](https://www.w3.org/TR/owl2-syntax/#Exact_Cardinality), outside of EL
    pub const CARDINALITY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#cardinality");
    /// [Minimum cardinality](https://www.w3.org/TR/owl2-syntax/#Minimum_Cardinality), outside of EL
    pub const MIN_CARDINALITY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#minCardinality");
    /// [Maximum cardinality](https://www.w3.org/TR/owl2-syntax/#Maximum_Cardinality), outside of EL
    pub const MAX_CARDINALITY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#maxCardinality");
}

crate::define_id_enum! {
    /// Identifier of a build-system detector, in default registration order
    DetectorId {
        AutogenConfMake => "autogen-conf-make" : "autogen-conf-make",
        PureCFiles => "pure-c" : "pure-c" | "pureCFileCompiler",
        PureCFilesFind => "pure-c-find" : "pure-c-find" | "pureCFileCompilerFind",
        Make => "make" : "make",
        MakePthread => "make-pthread" : "make-pthread",
        MakeSubstitutions => "make-substitutions" : "make-substitutions" | "makeWithSubstitutions",
        Autogen => "autogen" : "autogen",
        AutoreconfAutomake => "autoreconf" : "autoreconf",
        CMake => "cmake" : "cmake" | "CMake",
        MakeWithTests => "make-tests" : "make-tests" | "RawMake",
    }
}

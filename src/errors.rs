error_chain! {
    foreign_links {
        Io(::std::io::Error);
    }

    errors {
        MalformedToken(token: String) {
            description("malformed indel token")
            display("malformed indel token {:?}", token)
        }

        MalformedNumber(field: String, value: String) {
            description("malformed numeric field")
            display("invalid value {:?} for {}", value, field)
        }

        IncompatibleFeatureSet(missing: Vec<String>) {
            description("feature matrix lacks columns required by model")
            display("feature matrix lacks model columns: {}", missing.join(", "))
        }

        NonFiniteWeight(token: String, weight: f64) {
            description("predicted weight is not finite")
            display("predicted weight for {:?} is not finite ({})", token, weight)
        }

        InvalidWeight(token: String, weight: f64) {
            description("profile weight must be finite and non-negative")
            display("invalid weight {} for {:?}", weight, token)
        }

        MalformedTable(msg: String) {
            description("malformed table")
            display("malformed table: {}", msg)
        }

        InvalidTarget(msg: String) {
            description("invalid target sequence")
            display("invalid target: {}", msg)
        }
    }
}
